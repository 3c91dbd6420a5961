//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Object storage for uploaded images
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    FavoriteRepository, FavoriteStore, ReviewRepository, ReviewStore, ToolRepository, ToolStore,
    UserRepository, UserStore,
};
pub use storage::{ImageDirectory, ObjectStorage, S3Storage};
pub use unit_of_work::{Persistence, UnitOfWork};
