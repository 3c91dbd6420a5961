//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod favorite;
pub mod review;
pub mod tool;
pub mod tool_image;
pub mod user;
