//! Fixtures shared by service unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::domain::{Review, Tool, ToolImage, User, UserRole};
use crate::errors::AppResult;
use crate::infra::repositories::{
    MockFavoriteRepository, MockReviewRepository, MockToolRepository, MockUserRepository,
};
use crate::infra::{FavoriteRepository, ReviewRepository, ToolRepository, UnitOfWork, UserRepository};

/// UnitOfWork backed by mock repositories
#[derive(Default)]
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    tools: Arc<MockToolRepository>,
    reviews: Arc<MockReviewRepository>,
    favorites: Arc<MockFavoriteRepository>,
}

impl TestUnitOfWork {
    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_tools(mut self, repo: MockToolRepository) -> Self {
        self.tools = Arc::new(repo);
        self
    }

    pub fn with_reviews(mut self, repo: MockReviewRepository) -> Self {
        self.reviews = Arc::new(repo);
        self
    }

    pub fn with_favorites(mut self, repo: MockFavoriteRepository) -> Self {
        self.favorites = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn tools(&self) -> Arc<dyn ToolRepository> {
        self.tools.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorites.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn sample_user(id: i32) -> User {
    User {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        password_hash: "hashed".to_string(),
        profile_image: None,
        role: UserRole::User,
        phone_number: "+48 600 700 800".to_string(),
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_tool(id: i32, owner_id: i32) -> Tool {
    Tool {
        id,
        user_id: owner_id,
        name: format!("Tool {}", id),
        description: Some("Cordless drill".to_string()),
        category: Some("power tools".to_string()),
        price_per_day: 25.0,
        latitude: 52.23,
        longitude: 21.01,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_image(id: i32, tool_id: i32, url: &str) -> ToolImage {
    ToolImage {
        id,
        tool_id,
        image_url: url.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_review(id: i32, reviewer: i32, reviewed: i32) -> Review {
    Review {
        id,
        reviewer_user_id: reviewer,
        reviewed_user_id: reviewed,
        rating: 4,
        comment: Some("Reliable".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
