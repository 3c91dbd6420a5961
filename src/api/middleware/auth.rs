//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use super::handle_panic;
use crate::api::AppState;
use crate::errors::{AppError, AuthError};

/// Identity attached to a request after its token was verified
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
}

/// JWT authentication middleware.
///
/// Validates the `Authorization: Bearer <token>` header and injects the
/// `CurrentUser` into the request extensions. The identity is also copied
/// onto the response so the error responder can report who made the call.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::MalformedCredential))
        .transpose();

    let claims = match header.and_then(|h| state.tokens.authenticate_header(h)) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                category = err.category(),
                path = %request.uri().path(),
                "Token verification failed"
            );
            return Err(err.into());
        }
    };

    tracing::info!(user_id = claims.user_id, "Token verified");

    let current_user = CurrentUser {
        id: claims.user_id,
        email: claims.email,
    };
    request.extensions_mut().insert(current_user.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(current_user);
    Ok(response)
}

/// Put every route of `router` behind bearer authentication.
///
/// Panics are caught inside the auth layer so their envelope still carries the caller id.
pub fn require_auth(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router
        .route_layer(CatchPanicLayer::custom(handle_panic))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
