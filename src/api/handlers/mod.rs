//! HTTP request handlers, one module per resource.

pub mod favorite_handler;
pub mod review_handler;
pub mod tool_handler;
pub mod user_handler;

pub use favorite_handler::favorite_routes;
pub use review_handler::review_routes;
pub use tool_handler::tool_routes;
pub use user_handler::user_routes;
