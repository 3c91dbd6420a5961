//! Extract the identity set by the auth middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::middleware::CurrentUser;
use crate::errors::{AppError, AuthError};

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingCredential.into())
    }
}
