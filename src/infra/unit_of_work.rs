//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories behind one injectable handle.

use async_trait::async_trait;
use std::sync::Arc;

use super::db::Database;
use super::repositories::{
    FavoriteRepository, FavoriteStore, ReviewRepository, ReviewStore, ToolRepository, ToolStore,
    UserRepository, UserStore,
};
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get tool and tool image repository
    fn tools(&self) -> Arc<dyn ToolRepository>;

    /// Get review repository
    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Get favorite repository
    fn favorites(&self) -> Arc<dyn FavoriteRepository>;

    /// Check that the backing store answers queries
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Database,
    user_repo: Arc<UserStore>,
    tool_repo: Arc<ToolStore>,
    review_repo: Arc<ReviewStore>,
    favorite_repo: Arc<FavoriteStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Database) -> Self {
        let conn = db.get_connection();
        Self {
            user_repo: Arc::new(UserStore::new(conn.clone())),
            tool_repo: Arc::new(ToolStore::new(conn.clone())),
            review_repo: Arc::new(ReviewStore::new(conn.clone())),
            favorite_repo: Arc::new(FavoriteStore::new(conn)),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn tools(&self) -> Arc<dyn ToolRepository> {
        self.tool_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorite_repo.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}
