use crate::handlers::{get_survey, recommend, save_survey};
use crate::server::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Create the survey routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/survey", get(get_survey))
        .route("/survey", post(save_survey))
        .route("/survey/recommend", post(recommend))
}
