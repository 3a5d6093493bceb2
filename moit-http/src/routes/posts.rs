use crate::handlers::{create_post, delete_post, get_post, list_posts, update_post};
use crate::server::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Create the post routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", get(get_post))
        .route("/posts/{post_id}", put(update_post))
        .route("/posts/{post_id}", delete(delete_post))
}
