//! Bearer token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{Config, BEARER_SCHEME, DEFAULT_JWT_EXPIRATION_HOURS};
use crate::errors::{AppError, AppResult, AuthError};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Signs and verifies HS256 tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenAuthenticator {
    /// A lifetime chrono cannot represent falls back to the default.
    pub fn new(secret: &[u8], lifetime_hours: i64) -> Self {
        let lifetime = Duration::try_hours(lifetime_hours).unwrap_or_else(|| {
            tracing::warn!(lifetime_hours, "Token lifetime out of range, using default");
            Duration::hours(DEFAULT_JWT_EXPIRATION_HOURS)
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes(), config.jwt_expiration_hours)
    }

    /// Sign a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: i32, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: None,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Check signature and validity window of a raw token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                JwtErrorKind::ImmatureSignature => AuthError::NotYetValid,
                _ => AuthError::InvalidToken,
            })
    }

    /// Validate an `Authorization` header value of the form `Bearer <token>`.
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;

        let parts: Vec<&str> = header.split(' ').collect();
        match parts.as_slice() {
            [scheme, token] if *scheme == BEARER_SCHEME && !token.is_empty() => self.verify(token),
            _ => Err(AuthError::MalformedCredential),
        }
    }
}
