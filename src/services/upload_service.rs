use std::path::Path;

use axum::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    audit,
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    response::ApiResponse,
    state::AppState,
};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub content_type: String,
}

/// Checks the file name and size, returning the lower-cased extension and the
/// guessed content type.
pub fn check_image(filename: &str, size: usize) -> Result<(String, String), AppError> {
    if size == 0 {
        return Err(AppError::BadRequest("Empty file provided".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "File too large, maximum size is {}MB",
            MAX_UPLOAD_BYTES / 1024 / 1024
        )));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid file extension for {filename}")))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file format '{ext}', supported: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let mime = mime_guess::from_ext(&ext).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::BadRequest(format!("{filename} is not an image")));
    }

    Ok((ext, mime.essence_str().to_string()))
}

pub async fn upload_image(
    state: &AppState,
    AdminUser(user): &AdminUser,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadedImage>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("No filename provided in file field".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;
        file = Some((filename, data.to_vec()));
        break;
    }

    let (original_name, data) =
        file.ok_or_else(|| AppError::BadRequest("No 'file' field found".into()))?;
    let (ext, content_type) = check_image(&original_name, data.len())?;

    let filename = format!("{}.{ext}", Uuid::new_v4());
    let dir = Path::new(&state.config.upload_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save file: {e}")))?;

    tracing::info!(original_name = %original_name, filename = %filename, size = data.len(), "image uploaded");
    audit::record(
        state,
        Some(user.user_id),
        "upload",
        "uploads",
        serde_json::json!({ "filename": filename, "original_name": original_name }),
    )
    .await;

    let url = format!(
        "{}/uploads/{filename}",
        state.config.public_base_url.trim_end_matches('/')
    );
    Ok(ApiResponse::success(
        "Uploaded",
        UploadedImage {
            url,
            filename,
            size: data.len(),
            content_type,
        },
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_images() {
        let (ext, mime) = check_image("Pizza.JPG", 1024).unwrap();
        assert_eq!(ext, "jpg");
        assert_eq!(mime, "image/jpeg");
        assert_eq!(check_image("banner.webp", 10).unwrap().1, "image/webp");
    }

    #[test]
    fn rejects_bad_uploads() {
        assert!(check_image("notes.txt", 10).is_err());
        assert!(check_image("noext", 10).is_err());
        assert!(check_image("empty.png", 0).is_err());
        assert!(check_image("huge.png", MAX_UPLOAD_BYTES + 1).is_err());
    }
}
