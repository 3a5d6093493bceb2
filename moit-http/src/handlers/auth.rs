use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Json},
};
use moit_core::services::accounts::{self, NewAccount, ProfileChanges};

use crate::auth::{AuthUser, SESSION_COOKIE, session_token};
use crate::error::AppError;
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, MypageResponse, SignupRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::server::AppState;
use crate::session::manager::SESSION_TTL_HOURS;

fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_TTL_HOURS * 3600
    )
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Username, nickname or email already in use")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    accounts::signup(
        &state.storage,
        NewAccount {
            username: payload.username,
            password: payload.password,
            name: payload.name,
            nickname: payload.nickname,
            email: payload.email,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("account created")),
    ))
}

/// Log in and receive a session cookie
///
/// A fifth consecutive failure deactivates the account; the 401 body carries
/// the attempts left until then.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Wrong username or password"),
        (status = 403, description = "Account deactivated")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts::login(&state.storage, &payload.username, &payload.password).await?;
    let token = state.sessions.create_session(&user.id);
    tracing::info!(username = %user.username, "logged in");

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
        Json(LoginResponse { user: user.into() }),
    ))
}

/// Log out
///
/// Best-effort: the cookie is cleared even when no live session was attached.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove_session(&token);
    }
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(MessageResponse::new("logged out")),
    )
}

/// Current account for the presented session
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.into_inner().into())
}

/// Profile page data: the account plus hosted and joined meetings
#[utoipa::path(
    get,
    path = "/auth/mypage",
    responses(
        (status = 200, description = "Profile data", body = MypageResponse),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn mypage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MypageResponse>, AppError> {
    let user = auth.into_inner();
    let hosted = state.storage.meetings_hosted_by(&user.id).await?;
    let joined = state.storage.meetings_joined_by(&user.id).await?;

    Ok(Json(MypageResponse {
        user: user.into(),
        hosted_meetings: hosted.into_iter().map(Into::into).collect(),
        joined_meetings: joined.into_iter().map(Into::into).collect(),
    }))
}

/// Update nickname, email or password
#[utoipa::path(
    put,
    path = "/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized or wrong current password"),
        (status = 409, description = "Nickname or email already in use")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = accounts::update_profile(
        &state.storage,
        &auth.user().id,
        ProfileChanges {
            nickname: payload.nickname,
            email: payload.email,
            current_password: payload.current_password,
            new_password: payload.new_password,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Delete an account (self or admin)
#[utoipa::path(
    delete,
    path = "/auth/users/{user_id}",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    params(("user_id" = String, Path, description = "Account identifier"))
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    accounts::delete_account(&state.storage, auth.user(), &user_id).await?;
    state.sessions.remove_sessions(&user_id);
    Ok(Json(MessageResponse::new("account deleted")))
}
