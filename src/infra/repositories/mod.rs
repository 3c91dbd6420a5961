//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod favorite_repository;
mod review_repository;
mod tool_repository;
mod user_repository;

pub use favorite_repository::{FavoriteRepository, FavoriteStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use tool_repository::{ToolRepository, ToolStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use tool_repository::MockToolRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
