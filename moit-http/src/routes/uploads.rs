use crate::handlers::uploads::MAX_FILE_BYTES;
use crate::handlers::{upload_file, upload_image};
use crate::server::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};

/// Create the upload routes with state.
///
/// The body limit leaves headroom over the 50 MiB attachment cap for the
/// multipart framing; per-kind limits are enforced in the handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/uploads/image", post(upload_image))
        .route("/uploads/file", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_FILE_BYTES + 1024 * 1024))
}
