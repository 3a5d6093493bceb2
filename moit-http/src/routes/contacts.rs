use crate::handlers::{
    create_contact, delete_contact, get_contact, list_contacts, update_contact_status,
};
use crate::server::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Create the contact routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", post(create_contact))
        .route("/contacts", get(list_contacts))
        .route("/contacts/{contact_id}", get(get_contact))
        .route("/contacts/{contact_id}", put(update_contact_status))
        .route("/contacts/{contact_id}", delete(delete_contact))
}
