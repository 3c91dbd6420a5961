//! Review service - Ratings users give each other.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Review, ReviewChanges, ReviewDetails, UserSummary};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review `reviewed_user_id` on behalf of `reviewer_id`
    async fn create_review(
        &self,
        reviewer_id: i32,
        reviewed_user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review>;

    /// All reviews, optionally only those about one user
    async fn list_reviews(&self, reviewed_user_id: Option<i32>) -> AppResult<Vec<ReviewDetails>>;

    /// Reviews a user received; the user must exist
    async fn reviews_of(&self, user_id: i32) -> AppResult<Vec<ReviewDetails>>;

    /// Author-only partial update
    async fn update_review(
        &self,
        caller_id: i32,
        id: i32,
        changes: ReviewChanges,
    ) -> AppResult<Review>;

    /// Author-only delete
    async fn delete_review(&self, caller_id: i32, id: i32) -> AppResult<()>;
}

pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn authored_review(&self, caller_id: i32, id: i32, action: &str) -> AppResult<Review> {
        let review = self
            .uow
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Review not found")?;

        if !review.is_written_by(caller_id) {
            tracing::warn!(user_id = caller_id, review_id = id, action, "Review access denied");
            return Err(AppError::forbidden(format!(
                "You are not allowed to {} this review",
                action
            )));
        }
        Ok(review)
    }

    async fn with_parties(&self, reviews: Vec<Review>) -> AppResult<Vec<ReviewDetails>> {
        let mut ids: Vec<i32> = reviews
            .iter()
            .flat_map(|r| [r.reviewer_user_id, r.reviewed_user_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<i32, UserSummary> = self
            .uow
            .users()
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| ReviewDetails {
                reviewer: users.get(&review.reviewer_user_id).cloned(),
                reviewed: users.get(&review.reviewed_user_id).cloned(),
                review,
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn create_review(
        &self,
        reviewer_id: i32,
        reviewed_user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review> {
        let users = self.uow.users();
        users
            .find_by_id(reviewer_id)
            .await?
            .ok_or_not_found("Reviewer not found")?;
        users
            .find_by_id(reviewed_user_id)
            .await?
            .ok_or_not_found("Reviewed user not found")?;

        if self
            .uow
            .reviews()
            .find_between(reviewer_id, reviewed_user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You have already reviewed this user"));
        }

        let review = self
            .uow
            .reviews()
            .create(reviewer_id, reviewed_user_id, rating, comment)
            .await?;

        tracing::info!(
            review_id = review.id,
            reviewer_id,
            reviewed_user_id,
            "Review created"
        );
        Ok(review)
    }

    async fn list_reviews(&self, reviewed_user_id: Option<i32>) -> AppResult<Vec<ReviewDetails>> {
        let reviews = self.uow.reviews().list(reviewed_user_id).await?;
        self.with_parties(reviews).await
    }

    async fn reviews_of(&self, user_id: i32) -> AppResult<Vec<ReviewDetails>> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User not found")?;

        self.list_reviews(Some(user_id)).await
    }

    async fn update_review(
        &self,
        caller_id: i32,
        id: i32,
        changes: ReviewChanges,
    ) -> AppResult<Review> {
        self.authored_review(caller_id, id, "update").await?;
        let review = self.uow.reviews().update(id, changes).await?;
        tracing::info!(review_id = id, "Review updated");
        Ok(review)
    }

    async fn delete_review(&self, caller_id: i32, id: i32) -> AppResult<()> {
        self.authored_review(caller_id, id, "delete").await?;
        self.uow.reviews().delete(id).await?;
        tracing::info!(review_id = id, "Review deleted");
        Ok(())
    }
}
