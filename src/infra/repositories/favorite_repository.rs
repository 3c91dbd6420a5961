//! Favorite repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::favorite::{self, Entity as FavoriteEntity};
use crate::domain::Favorite;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn create(&self, user_id: i32, tool_id: i32) -> AppResult<Favorite>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Favorite>>;

    /// Favorite linking `user_id` and `tool_id`, if any
    async fn find_for(&self, user_id: i32, tool_id: i32) -> AppResult<Option<Favorite>>;

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Favorite>>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM implementation of FavoriteRepository
pub struct FavoriteStore {
    db: DatabaseConnection,
}

impl FavoriteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn create(&self, user_id: i32, tool_id: i32) -> AppResult<Favorite> {
        let active_model = favorite::ActiveModel {
            user_id: Set(user_id),
            tool_id: Set(tool_id),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Favorite::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Favorite>> {
        let result = FavoriteEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Favorite::from))
    }

    async fn find_for(&self, user_id: i32, tool_id: i32) -> AppResult<Option<Favorite>> {
        let result = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::ToolId.eq(tool_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Favorite::from))
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Favorite>> {
        let models = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_asc(favorite::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Favorite::from).collect())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = FavoriteEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Favorite not found"));
        }

        Ok(())
    }
}
