use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use moit_core::models::User;

/// The authenticated user resolved by the middleware, stored in request
/// extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extractor for the authenticated user
///
/// This extractor gets the authenticated user from the request extensions
/// without consuming the request body. Rejects with 401 when the request
/// carries no valid session.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Get a reference to the inner user
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Unwrap the extractor to get the inner user
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(StatusCode::UNAUTHORIZED)?
            .0
            .clone();

        Ok(AuthUser(user))
    }
}

/// Extractor for endpoints that personalize their response when a session is
/// present but stay public without one.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts.extensions.get::<CurrentUser>().map(|u| u.0.clone()),
        ))
    }
}

/// Extractor for the authenticated admin user
///
/// Ensures that the user has the admin flag; 403 otherwise.
pub struct AuthAdmin(pub User);

impl AuthAdmin {
    /// Get a reference to the inner user
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(StatusCode::UNAUTHORIZED)?
            .0
            .clone();

        if !user.is_admin() {
            return Err(StatusCode::FORBIDDEN);
        }

        Ok(AuthAdmin(user))
    }
}
