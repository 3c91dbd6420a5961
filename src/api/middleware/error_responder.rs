//! Final error responder.
//!
//! Handlers and extractors turn failures into `AppError` responses that carry
//! an `ErrorReport`. This middleware sits outside every route and rewrites
//! those responses with the request context, logging each one once.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::CurrentUser;
use crate::api::AppState;
use crate::errors::{AppError, ErrorEnvelope, ErrorReport, RequestContext};

/// Best-effort caller address.
///
/// Uses X-Forwarded-For header if behind proxy, otherwise the connection IP.
pub fn client_ip(request: &Request) -> String {
    // Take the first IP in the chain (original client)
    if let Some(ip) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.trim().to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Rewrite error responses into the full envelope.
pub async fn error_responder(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().to_string();
    let ip = client_ip(&request);

    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let context = RequestContext {
        path,
        method,
        ip,
        user_id: response.extensions().get::<CurrentUser>().map(|u| u.id),
    };
    let development = state.environment.is_development();

    log_error(&report, &context, development);

    ErrorEnvelope::build(&report, &context, Utc::now(), development).into_response_with(report)
}

fn log_error(report: &ErrorReport, context: &RequestContext, development: bool) {
    let detail = development.then_some(report.detail.as_str());

    if report.kind.status().is_server_error() {
        tracing::error!(
            code = report.kind.code(),
            message = %report.message,
            path = %context.path,
            method = %context.method,
            ip = %context.ip,
            user_id = ?context.user_id,
            detail = ?detail,
            "Request failed"
        );
    } else {
        tracing::warn!(
            code = report.kind.code(),
            message = %report.message,
            path = %context.path,
            method = %context.method,
            ip = %context.ip,
            user_id = ?context.user_id,
            detail = ?detail,
            "Request rejected"
        );
    }
}

/// Turn a handler panic into an internal error response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::internal(format!("Handler panicked: {}", detail)).into_response()
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}
