//! Service Container - Centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait, not on concrete
//! services, so the HTTP layer can be driven with in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, FavoriteManager, FavoriteService, ReviewManager, ReviewService,
    TokenAuthenticator, ToolManager, ToolService, UserManager, UserService,
};
use crate::errors::AppResult;
use crate::infra::{ObjectStorage, UnitOfWork};

/// Service container trait for dependency injection.
#[async_trait]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    fn tools(&self) -> Arc<dyn ToolService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn favorites(&self) -> Arc<dyn FavoriteService>;

    /// Check the database behind the services
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of ServiceContainer
pub struct Services<U: UnitOfWork> {
    uow: Arc<U>,
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    tool_service: Arc<dyn ToolService>,
    review_service: Arc<dyn ReviewService>,
    favorite_service: Arc<dyn FavoriteService>,
}

impl<U: UnitOfWork + 'static> Services<U> {
    /// Wire every service onto one unit of work and storage backend
    pub fn new(
        uow: Arc<U>,
        tokens: Arc<TokenAuthenticator>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            user_service: Arc::new(UserManager::new(uow.clone(), storage.clone())),
            tool_service: Arc::new(ToolManager::new(uow.clone(), storage)),
            review_service: Arc::new(ReviewManager::new(uow.clone())),
            favorite_service: Arc::new(FavoriteManager::new(uow.clone())),
            uow,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> ServiceContainer for Services<U> {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn tools(&self) -> Arc<dyn ToolService> {
        self.tool_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteService> {
        self.favorite_service.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.uow.ping().await
    }
}
