use crate::handlers::{
    cancel_participation, create_meeting, delete_meeting, get_meeting, get_stats, join_meeting,
    list_meetings, list_participants, match_meetings, similar_meetings, update_meeting,
};
use crate::server::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Create the meeting routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meetings", get(list_meetings))
        .route("/meetings", post(create_meeting))
        .route("/meetings/stats", get(get_stats))
        .route("/meetings/similar", post(similar_meetings))
        .route("/meetings/match", post(match_meetings))
        .route("/meetings/{meeting_id}", get(get_meeting))
        .route("/meetings/{meeting_id}", put(update_meeting))
        .route("/meetings/{meeting_id}", delete(delete_meeting))
        .route("/meetings/{meeting_id}/join", post(join_meeting))
        .route("/meetings/{meeting_id}/join", delete(cancel_participation))
        .route(
            "/meetings/{meeting_id}/participants",
            get(list_participants),
        )
}
