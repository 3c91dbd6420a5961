//! Tool and tool image repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::tool::{self, Entity as ToolEntity};
use super::entities::tool_image::{self, Entity as ToolImageEntity};
use crate::domain::{NewTool, Tool, ToolChanges, ToolImage};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// Create a tool owned by `owner_id`
    async fn create(&self, owner_id: i32, new_tool: NewTool) -> AppResult<Tool>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Tool>>;

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Tool>>;

    /// All tools, oldest first
    async fn list(&self) -> AppResult<Vec<Tool>>;

    /// Apply a partial update
    async fn update(&self, id: i32, changes: ToolChanges) -> AppResult<Tool>;

    /// Delete tool; images and favorites cascade
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn add_image(&self, tool_id: i32, image_url: String) -> AppResult<ToolImage>;

    async fn find_image(&self, image_id: i32) -> AppResult<Option<ToolImage>>;

    /// Images belonging to any of `tool_ids`
    async fn images_for(&self, tool_ids: &[i32]) -> AppResult<Vec<ToolImage>>;

    async fn delete_image(&self, image_id: i32) -> AppResult<()>;
}

/// SeaORM implementation of ToolRepository
pub struct ToolStore {
    db: DatabaseConnection,
}

impl ToolStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ToolRepository for ToolStore {
    async fn create(&self, owner_id: i32, new_tool: NewTool) -> AppResult<Tool> {
        let now = chrono::Utc::now();
        let active_model = tool::ActiveModel {
            user_id: Set(owner_id),
            name: Set(new_tool.name),
            description: Set(new_tool.description),
            category: Set(new_tool.category),
            price_per_day: Set(new_tool.price_per_day),
            latitude: Set(new_tool.latitude),
            longitude: Set(new_tool.longitude),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Tool::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Tool>> {
        let result = ToolEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Tool::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Tool>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ToolEntity::find()
            .filter(tool::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Tool::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<Tool>> {
        let models = ToolEntity::find()
            .order_by_asc(tool::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Tool::from).collect())
    }

    async fn update(&self, id: i32, changes: ToolChanges) -> AppResult<Tool> {
        let model = ToolEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Tool not found")?;

        let mut active: tool::ActiveModel = model.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = changes.category {
            active.category = Set(Some(category));
        }
        if let Some(price_per_day) = changes.price_per_day {
            active.price_per_day = Set(price_per_day);
        }
        if let Some(latitude) = changes.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = changes.longitude {
            active.longitude = Set(longitude);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Tool::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ToolEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Tool not found"));
        }

        Ok(())
    }

    async fn add_image(&self, tool_id: i32, image_url: String) -> AppResult<ToolImage> {
        let now = chrono::Utc::now();
        let active_model = tool_image::ActiveModel {
            tool_id: Set(tool_id),
            image_url: Set(image_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(ToolImage::from(model))
    }

    async fn find_image(&self, image_id: i32) -> AppResult<Option<ToolImage>> {
        let result = ToolImageEntity::find_by_id(image_id).one(&self.db).await?;
        Ok(result.map(ToolImage::from))
    }

    async fn images_for(&self, tool_ids: &[i32]) -> AppResult<Vec<ToolImage>> {
        if tool_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ToolImageEntity::find()
            .filter(tool_image::Column::ToolId.is_in(tool_ids.iter().copied()))
            .order_by_asc(tool_image::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ToolImage::from).collect())
    }

    async fn delete_image(&self, image_id: i32) -> AppResult<()> {
        let result = ToolImageEntity::delete_by_id(image_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Image not found"));
        }

        Ok(())
    }
}
