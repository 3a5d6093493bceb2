use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use moit_core::CoreError;
use moit_core::models::{Contact, ContactStatus};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{
    ContactResponse, CreateContactRequest, MessageResponse, UpdateContactStatusRequest,
};
use crate::server::AppState;

/// Submit a contact-form inquiry (public)
#[utoipa::path(
    post,
    path = "/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Inquiry received", body = MessageResponse),
        (status = 400, description = "Missing field")
    )
)]
#[axum::debug_handler]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.phone.trim().is_empty()
        || payload.message.trim().is_empty()
    {
        return Err(CoreError::validation("name, email, phone and message are required").into());
    }

    let now = Utc::now();
    let contact = Contact {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        message: payload.message,
        status: ContactStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    state.storage.insert_contact(&contact).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("inquiry received")),
    ))
}

/// List inquiries (staff)
#[utoipa::path(
    get,
    path = "/contacts",
    responses(
        (status = 200, description = "Inquiries", body = [ContactResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn list_contacts(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let contacts = state.storage.list_contacts().await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// Fetch one inquiry (staff)
#[utoipa::path(
    get,
    path = "/contacts/{contact_id}",
    responses(
        (status = 200, description = "Inquiry", body = ContactResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Inquiry not found")
    ),
    params(("contact_id" = String, Path, description = "Inquiry identifier"))
)]
#[axum::debug_handler]
pub async fn get_contact(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(contact_id): Path<String>,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = state
        .storage
        .get_contact(&contact_id)
        .await?
        .ok_or(CoreError::NotFound("contact"))?;
    Ok(Json(contact.into()))
}

/// Update an inquiry's processing status (staff)
#[utoipa::path(
    put,
    path = "/contacts/{contact_id}",
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ContactResponse),
        (status = 400, description = "Unknown status value"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Inquiry not found")
    ),
    params(("contact_id" = String, Path, description = "Inquiry identifier"))
)]
#[axum::debug_handler]
pub async fn update_contact_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(contact_id): Path<String>,
    Json(payload): Json<UpdateContactStatusRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    let status: ContactStatus = payload
        .status
        .parse()
        .map_err(|_| CoreError::validation(format!("unknown status: {}", payload.status)))?;
    let contact = state
        .storage
        .update_contact_status(&contact_id, status, Utc::now())
        .await?
        .ok_or(CoreError::NotFound("contact"))?;
    Ok(Json(contact.into()))
}

/// Delete an inquiry (staff)
#[utoipa::path(
    delete,
    path = "/contacts/{contact_id}",
    responses(
        (status = 200, description = "Inquiry deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Inquiry not found")
    ),
    params(("contact_id" = String, Path, description = "Inquiry identifier"))
)]
#[axum::debug_handler]
pub async fn delete_contact(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(contact_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if state.storage.delete_contact(&contact_id).await? {
        Ok(Json(MessageResponse::new("inquiry deleted")))
    } else {
        Err(CoreError::NotFound("contact").into())
    }
}
