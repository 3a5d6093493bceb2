use axum::{
    extract::{Multipart, State},
    response::Json,
};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{FileUploadResponse, ImageUploadResponse};
use crate::server::AppState;

/// Inline post images stay small.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Attachments get more headroom.
pub const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

fn multipart_err(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("invalid multipart body: {e}"))
}

/// Extension of the uploaded file name, falling back to `bin`.
fn extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
}

/// Attachment names keep their final path component only.
fn sanitize_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

/// Upload a post image
///
/// Multipart field `image`, at most 5 MiB. The object lands under a fresh
/// UUID key, so identical uploads never collide.
#[utoipa::path(
    post,
    path = "/uploads/image",
    responses(
        (status = 200, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "Missing image field"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Image over 5 MiB")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(multipart_err)?;
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::PayloadTooLarge(
                "image exceeds the 5 MiB limit".to_string(),
            ));
        }

        let key = format!(
            "post-images/{}.{}",
            uuid::Uuid::new_v4(),
            extension(&file_name)
        );
        let image_url = state.objects.put(&key, data.to_vec(), &content_type).await?;
        return Ok(Json(ImageUploadResponse { image_url }));
    }
    Err(AppError::BadRequest("missing image field".to_string()))
}

/// Upload a post attachment
///
/// Multipart fields `file` and (optionally) `original_name`; at most 50 MiB.
/// Attachments keep their file name so downloads look right.
#[utoipa::path(
    post,
    path = "/uploads/file",
    responses(
        (status = 200, description = "File stored", body = FileUploadResponse),
        (status = 400, description = "Missing file field"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "File over 50 MiB")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<FileUploadResponse>, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut original_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                if data.len() > MAX_FILE_BYTES {
                    return Err(AppError::PayloadTooLarge(
                        "file exceeds the 50 MiB limit".to_string(),
                    ));
                }
                file = Some((file_name, content_type, data.to_vec()));
            }
            Some("original_name") => {
                original_name = Some(field.text().await.map_err(multipart_err)?);
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return Err(AppError::BadRequest("missing file field".to_string()));
    };
    let name = original_name
        .as_deref()
        .and_then(sanitize_name)
        .or_else(|| sanitize_name(&file_name))
        .ok_or_else(|| AppError::BadRequest("unusable file name".to_string()))?;

    let key = format!("post-files/{name}");
    let file_url = state.objects.put(&key, data, &content_type).await?;

    Ok(Json(FileUploadResponse {
        file_url,
        original_name: name,
    }))
}
