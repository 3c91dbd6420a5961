//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::{Config, Environment};
use crate::services::{ServiceContainer, TokenAuthenticator};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Business services
    pub services: Arc<dyn ServiceContainer>,
    /// Bearer token verification
    pub tokens: Arc<TokenAuthenticator>,
    /// Decides whether error details reach clients
    pub environment: Environment,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        tokens: Arc<TokenAuthenticator>,
        config: &Config,
    ) -> Self {
        Self {
            services,
            tokens,
            environment: config.environment,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
