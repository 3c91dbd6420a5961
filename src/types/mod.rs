//! Shared response shapes.

mod response;

pub use response::{Created, MessageResponse, SuccessResponse};
