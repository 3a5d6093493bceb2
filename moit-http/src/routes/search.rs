use crate::handlers::ai_search;
use crate::server::AppState;
use axum::{Router, routing::post};

/// Create the search routes with state
pub fn routes() -> Router<AppState> {
    Router::new().route("/search/ai", post(ai_search))
}
