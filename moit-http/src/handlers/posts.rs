use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use moit_core::services::posts::{self, PostDraft};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{CreatePostRequest, MessageResponse, PostResponse, UpdatePostRequest};
use crate::server::AppState;

impl From<CreatePostRequest> for PostDraft {
    fn from(payload: CreatePostRequest) -> Self {
        Self {
            title: payload.title,
            content: payload.content,
            file_urls: payload.file_urls,
        }
    }
}

/// First X-Forwarded-For hop, or "unknown" when the request carries none.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    responses((status = 200, description = "Posts", body = [PostResponse]))
)]
#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = state.storage.list_posts().await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// Read a post
///
/// Counts the view unless the same visitor (ip + user agent) read it within
/// the last 24 hours.
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    params(("post_id" = String, Path, description = "Post identifier"))
)]
#[axum::debug_handler]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PostResponse>, AppError> {
    let post = posts::view_post(
        &state.storage,
        &post_id,
        &client_ip(&headers),
        &user_agent(&headers),
        chrono::Utc::now(),
    )
    .await?;
    Ok(Json(post.into()))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing title or content"),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = posts::create_post(&state.storage, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// Update a post
///
/// Objects the new revision no longer references (inline images, attachments)
/// are deleted from the store.
#[utoipa::path(
    put,
    path = "/posts/{post_id}",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    params(("post_id" = String, Path, description = "Post identifier"))
)]
#[axum::debug_handler]
pub async fn update_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let post = posts::update_post(
        &state.storage,
        state.objects.as_ref(),
        &post_id,
        payload.into(),
    )
    .await?;
    Ok(Json(post.into()))
}

/// Delete a post
///
/// The row is removed before the response; attached objects are cleaned up in
/// the background.
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    params(("post_id" = String, Path, description = "Post identifier"))
)]
#[axum::debug_handler]
pub async fn delete_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    posts::delete_post(&state.storage, state.objects.clone(), &post_id).await?;
    Ok(Json(MessageResponse::new("post deleted")))
}
