//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through a Unit of Work.

mod auth_service;
pub mod container;
mod favorite_service;
mod review_service;
mod token_service;
mod tool_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginOutcome, Registration};
pub use favorite_service::{FavoriteManager, FavoriteService};
pub use review_service::{ReviewManager, ReviewService};
pub use token_service::{Claims, TokenAuthenticator};
pub use tool_service::{ToolManager, ToolService};
pub use user_service::{UserManager, UserService};

use crate::errors::AppResult;
use crate::infra::ObjectStorage;

/// Delete a stored image if it lives in our storage; foreign URLs are left alone.
pub(crate) async fn discard_image(storage: &dyn ObjectStorage, url: &str) -> AppResult<()> {
    if storage.owns(url) {
        storage.delete(url).await
    } else {
        tracing::debug!(url, "Image is not in our storage, nothing to delete");
        Ok(())
    }
}
