use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::auth::extractor::CurrentUser;
use crate::server::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "moit_session";

/// Header alternative to the cookie, mainly for non-browser clients.
pub const SESSION_HEADER: &str = "X-Session-Token";

/// Axum middleware for session authentication.
///
/// Resolves the session token (cookie or header) to a user and stores it in
/// the request extensions. It never rejects: public endpoints work without a
/// token and the `AuthUser` extractor produces the 401 where one is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        if let Some(session) = state.sessions.get_session(&token) {
            match state.storage.find_user_by_id(&session.user_id).await {
                Ok(Some(user)) if user.is_active => {
                    request.extensions_mut().insert(CurrentUser(user));
                }
                Ok(_) => {}
                Err(e) => tracing::error!("user lookup failed during auth: {e}"),
            }
        }
    }
    next.run(request).await
}

/// Extract the session token from the request headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }
    cookie_value(headers, SESSION_COOKIE)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, val)) = pair.trim().split_once('=') {
                if key == name && !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}
