//! API middleware.

mod auth;
mod error_responder;

pub use auth::{auth_middleware, require_auth, CurrentUser};
pub use error_responder::{client_ip, error_responder, handle_panic, route_not_found};
