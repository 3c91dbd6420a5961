//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod favorite;
pub mod password;
pub mod review;
pub mod tool;
pub mod user;

pub use favorite::{Favorite, FavoriteDetails, FavoriteTool};
pub use password::Password;
pub use review::{Review, ReviewChanges, ReviewDetails};
pub use tool::{NewTool, Tool, ToolChanges, ToolDetails, ToolImage};
pub use user::{NewUser, ProfileChanges, User, UserResponse, UserRole, UserSummary};
