//! Multipart image field reading.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::{AppError, AppResult};

/// An image taken from a multipart form
#[derive(Debug)]
pub struct UploadedImage {
    pub data: Bytes,
    pub mime_type: String,
}

/// Read the image in `field_name`, enforcing `image/*` and `max_bytes`.
///
/// Other fields are skipped.
pub async fn read_image_field(
    mut multipart: Multipart,
    field_name: &str,
    max_bytes: usize,
) -> AppResult<UploadedImage> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        if !mime_type.starts_with("image/") {
            return Err(AppError::validation("Only image files are allowed"));
        }

        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if data.len() > max_bytes {
            return Err(AppError::validation(format!(
                "File is too large, maximum size is {} bytes",
                max_bytes
            )));
        }

        return Ok(UploadedImage { data, mime_type });
    }

    Err(AppError::validation(format!(
        "No file uploaded in field '{}'",
        field_name
    )))
}
