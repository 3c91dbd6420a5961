//! Centralized error handling.
//!
//! Domain logic returns [`AppError`]; every variant belongs to one
//! [`ErrorKind`], and the kind alone decides the HTTP status and the
//! client-facing `code`. Responses carry the uniform [`ErrorEnvelope`].

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Closed set of error kinds exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// HTTP status for this kind
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for clients
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT_ERROR",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Why a credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingCredential,

    #[error("Invalid authorization header format")]
    MalformedCredential,

    #[error("Token has expired")]
    Expired,

    #[error("Token is not active yet")]
    NotYetValid,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,
}

impl AuthError {
    /// Short category used in audit logs
    pub const fn category(self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing",
            AuthError::MalformedCredential => "malformed",
            AuthError::Expired => "expired",
            AuthError::NotYetValid => "not_yet_valid",
            AuthError::InvalidToken => "invalid",
            AuthError::InvalidCredentials => "bad_credentials",
            AuthError::IncorrectPassword => "incorrect_password",
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Unclassified failures, reported as 500
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Message shown for every unclassified failure.
const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Authorization(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Authentication(_) => ErrorKind::Authentication,
            AppError::Authorization(_) => ErrorKind::Authorization,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Client-facing message (hides internal details)
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => INTERNAL_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::conflict("Resource already exists")
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::not_found("Referenced resource not found")
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(err.body_text())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, msg: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, msg: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(msg))
    }
}

/// What the responder needs to know about a failure, detached from the error value.
///
/// Stored in the response extensions so the outer responder can rebuild the
/// envelope with request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    /// Full debug chain, only ever exposed in development mode
    pub detail: String,
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.client_message(),
            detail: format!("{:?}", err),
        }
    }
}

/// Request facts recorded alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    pub ip: String,
    pub user_id: Option<i32>,
}

impl RequestContext {
    /// Context for errors rendered outside of a request pipeline
    pub fn detached() -> Self {
        Self {
            path: String::new(),
            method: String::new(),
            ip: "unknown".to_string(),
            user_id: None,
        }
    }
}

/// Uniform JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub ip: String,
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    /// Build the envelope; `stack` is filled only when `expose_detail` is set.
    pub fn build(
        report: &ErrorReport,
        context: &RequestContext,
        timestamp: DateTime<Utc>,
        expose_detail: bool,
    ) -> Self {
        Self {
            status: "error",
            code: report.kind.code(),
            message: report.message.clone(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            path: context.path.clone(),
            method: context.method.clone(),
            ip: context.ip.clone(),
            user_id: context.user_id,
            stack: expose_detail.then(|| report.detail.clone()),
        }
    }

    /// Render as an HTTP response, keeping the report for outer middleware.
    pub fn into_response_with(self, report: ErrorReport) -> Response {
        let mut response = (report.kind.status(), Json(self)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = ErrorReport::from(&self);
        ErrorEnvelope::build(&report, &RequestContext::detached(), Utc::now(), false)
            .into_response_with(report)
    }
}
