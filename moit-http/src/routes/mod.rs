pub mod auth;
pub mod contacts;
pub mod meetings;
pub mod posts;
pub mod search;
pub mod survey;
pub mod uploads;

use crate::handlers;
use crate::models::{
    AiSearchRequest, AiSearchResponse, ContactResponse, CreateContactRequest,
    CreateMeetingRequest, CreatePostRequest, FileUploadResponse, ImageUploadResponse,
    LoginRequest, LoginResponse, MatchMeetingsRequest, MeetingDetailResponse,
    MeetingListResponse, MeetingResponse,
    MeetingSummaryResponse, MessageResponse, MypageResponse, PostResponse, RecommendRequest,
    SaveSurveyRequest, SignupRequest, SimilarMeetingsRequest, StatsResponse,
    SurveyResultResponse, UpdateContactStatusRequest, UpdateProfileRequest, UserResponse,
};
use crate::server::AppState;
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::mypage,
        handlers::auth::update_profile,
        handlers::auth::delete_user,
        handlers::meetings::list_meetings,
        handlers::meetings::create_meeting,
        handlers::meetings::get_meeting,
        handlers::meetings::update_meeting,
        handlers::meetings::delete_meeting,
        handlers::meetings::join_meeting,
        handlers::meetings::cancel_participation,
        handlers::meetings::list_participants,
        handlers::meetings::similar_meetings,
        handlers::meetings::match_meetings,
        handlers::meetings::get_stats,
        handlers::posts::list_posts,
        handlers::posts::get_post,
        handlers::posts::create_post,
        handlers::posts::update_post,
        handlers::posts::delete_post,
        handlers::contacts::create_contact,
        handlers::contacts::list_contacts,
        handlers::contacts::get_contact,
        handlers::contacts::update_contact_status,
        handlers::contacts::delete_contact,
        handlers::survey::get_survey,
        handlers::survey::save_survey,
        handlers::survey::recommend,
        handlers::search::ai_search,
        handlers::uploads::upload_image,
        handlers::uploads::upload_file
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        LoginResponse,
        UserResponse,
        MessageResponse,
        MypageResponse,
        UpdateProfileRequest,
        CreateMeetingRequest,
        MeetingResponse,
        MeetingSummaryResponse,
        MeetingListResponse,
        MeetingDetailResponse,
        SimilarMeetingsRequest,
        MatchMeetingsRequest,
        StatsResponse,
        CreatePostRequest,
        PostResponse,
        CreateContactRequest,
        UpdateContactStatusRequest,
        ContactResponse,
        SaveSurveyRequest,
        SurveyResultResponse,
        RecommendRequest,
        AiSearchRequest,
        AiSearchResponse,
        ImageUploadResponse,
        FileUploadResponse
    ))
)]
struct ApiDoc;

/// Create the main API router with state
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_router())
}

/// Create the v1 API router with state
fn api_v1_router() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(meetings::routes())
        .merge(posts::routes())
        .merge(contacts::routes())
        .merge(survey::routes())
        .merge(search::routes())
        .merge(uploads::routes())
}

/// Health check endpoint for container health monitoring
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
