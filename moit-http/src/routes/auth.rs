use crate::handlers::{delete_user, login, logout, me, mypage, signup, update_profile};
use crate::server::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Create the auth routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/mypage", get(mypage))
        .route("/auth/profile", put(update_profile))
        .route("/auth/users/{user_id}", delete(delete_user))
}
