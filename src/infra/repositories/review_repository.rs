//! Review repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::review::{self, Entity as ReviewEntity};
use crate::domain::{Review, ReviewChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(
        &self,
        reviewer_user_id: i32,
        reviewed_user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Review>>;

    /// Review `reviewer_user_id` wrote about `reviewed_user_id`, if any
    async fn find_between(
        &self,
        reviewer_user_id: i32,
        reviewed_user_id: i32,
    ) -> AppResult<Option<Review>>;

    /// All reviews, or only those about `reviewed_user_id`
    async fn list(&self, reviewed_user_id: Option<i32>) -> AppResult<Vec<Review>>;

    async fn update(&self, id: i32, changes: ReviewChanges) -> AppResult<Review>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM implementation of ReviewRepository
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn create(
        &self,
        reviewer_user_id: i32,
        reviewed_user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review> {
        let now = chrono::Utc::now();
        let active_model = review::ActiveModel {
            reviewer_user_id: Set(reviewer_user_id),
            reviewed_user_id: Set(reviewed_user_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Review::from))
    }

    async fn find_between(
        &self,
        reviewer_user_id: i32,
        reviewed_user_id: i32,
    ) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find()
            .filter(review::Column::ReviewerUserId.eq(reviewer_user_id))
            .filter(review::Column::ReviewedUserId.eq(reviewed_user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Review::from))
    }

    async fn list(&self, reviewed_user_id: Option<i32>) -> AppResult<Vec<Review>> {
        let mut query = ReviewEntity::find();
        if let Some(reviewed) = reviewed_user_id {
            query = query.filter(review::Column::ReviewedUserId.eq(reviewed));
        }

        let models = query
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn update(&self, id: i32, changes: ReviewChanges) -> AppResult<Review> {
        let model = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Review not found")?;

        let mut active: review::ActiveModel = model.into();

        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = changes.comment {
            active.comment = Set(Some(comment));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Review not found"));
        }

        Ok(())
    }
}
