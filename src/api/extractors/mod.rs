//! Custom extractors that reject with `AppError`.

mod current_user;
mod image_upload;
mod validated_json;

use axum::extract::{FromRequestParts, Path, Query};

use crate::errors::AppError;

pub use image_upload::{read_image_field, UploadedImage};
pub use validated_json::ValidatedJson;

/// `Path` whose rejection is a validation error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is a validation error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
