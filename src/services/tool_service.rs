//! Tool service - Listings and their images.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

use super::discard_image;
use crate::domain::{NewTool, Tool, ToolChanges, ToolDetails, ToolImage, UserSummary};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ImageDirectory, ObjectStorage, UnitOfWork};

#[async_trait]
pub trait ToolService: Send + Sync {
    /// Create a tool owned by `owner_id`
    async fn create_tool(&self, owner_id: i32, new_tool: NewTool) -> AppResult<Tool>;

    /// All tools with owner and images
    async fn list_tools(&self) -> AppResult<Vec<ToolDetails>>;

    async fn get_tool(&self, id: i32) -> AppResult<ToolDetails>;

    /// Owner-only partial update
    async fn update_tool(&self, caller_id: i32, id: i32, changes: ToolChanges) -> AppResult<Tool>;

    /// Owner-only delete
    async fn delete_tool(&self, caller_id: i32, id: i32) -> AppResult<()>;

    /// Attach an externally hosted image URL
    async fn add_image_url(
        &self,
        caller_id: i32,
        tool_id: i32,
        image_url: String,
    ) -> AppResult<ToolImage>;

    /// Upload an image file and attach it
    async fn upload_image(
        &self,
        caller_id: i32,
        tool_id: i32,
        data: Bytes,
        mime_type: String,
    ) -> AppResult<ToolImage>;

    async fn list_images(&self, tool_id: i32) -> AppResult<Vec<ToolImage>>;

    /// Owner-only image removal
    async fn delete_image(&self, caller_id: i32, tool_id: i32, image_id: i32) -> AppResult<()>;
}

pub struct ToolManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> ToolManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }

    async fn find_tool(&self, id: i32) -> AppResult<Tool> {
        self.uow
            .tools()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Tool not found")
    }

    /// Load a tool and make sure `caller_id` owns it
    async fn owned_tool(&self, caller_id: i32, id: i32, action: &str) -> AppResult<Tool> {
        let tool = self.find_tool(id).await?;
        if !tool.is_owned_by(caller_id) {
            tracing::warn!(user_id = caller_id, tool_id = id, action, "Tool access denied");
            return Err(AppError::forbidden(format!(
                "You are not allowed to {} this tool",
                action
            )));
        }
        Ok(tool)
    }

    /// Resolve owners and images for a batch of tools
    async fn with_details(&self, tools: Vec<Tool>) -> AppResult<Vec<ToolDetails>> {
        let tool_ids: Vec<i32> = tools.iter().map(|t| t.id).collect();
        let mut owner_ids: Vec<i32> = tools.iter().map(|t| t.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let users = self.uow.users();
        let tool_repo = self.uow.tools();
        let (owners, images) = tokio::try_join!(
            users.find_by_ids(&owner_ids),
            tool_repo.images_for(&tool_ids),
        )?;

        let owners: HashMap<i32, UserSummary> = owners
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();
        let mut images_by_tool: HashMap<i32, Vec<ToolImage>> = HashMap::new();
        for image in images {
            images_by_tool.entry(image.tool_id).or_default().push(image);
        }

        Ok(tools
            .into_iter()
            .map(|tool| ToolDetails {
                owner: owners.get(&tool.user_id).cloned(),
                images: images_by_tool.remove(&tool.id).unwrap_or_default(),
                tool,
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> ToolService for ToolManager<U> {
    async fn create_tool(&self, owner_id: i32, new_tool: NewTool) -> AppResult<Tool> {
        self.uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found("User not found")?;

        let tool = self.uow.tools().create(owner_id, new_tool).await?;
        tracing::info!(user_id = owner_id, tool_id = tool.id, "Tool created");
        Ok(tool)
    }

    async fn list_tools(&self) -> AppResult<Vec<ToolDetails>> {
        let tools = self.uow.tools().list().await?;
        self.with_details(tools).await
    }

    async fn get_tool(&self, id: i32) -> AppResult<ToolDetails> {
        let tool = self.find_tool(id).await?;
        let mut details = self.with_details(vec![tool]).await?;
        details.pop().ok_or_not_found("Tool not found")
    }

    async fn update_tool(&self, caller_id: i32, id: i32, changes: ToolChanges) -> AppResult<Tool> {
        self.owned_tool(caller_id, id, "update").await?;
        let tool = self.uow.tools().update(id, changes).await?;
        tracing::info!(user_id = caller_id, tool_id = id, "Tool updated");
        Ok(tool)
    }

    async fn delete_tool(&self, caller_id: i32, id: i32) -> AppResult<()> {
        self.owned_tool(caller_id, id, "delete").await?;
        let images = self.uow.tools().images_for(&[id]).await?;

        self.uow.tools().delete(id).await?;
        tracing::info!(user_id = caller_id, tool_id = id, "Tool deleted");

        // Rows are gone with the tool; stored objects are cleaned up best effort
        for image in images {
            if let Err(e) = discard_image(self.storage.as_ref(), &image.image_url).await {
                tracing::warn!(tool_id = id, error = %e, "Failed to delete stored tool image");
            }
        }
        Ok(())
    }

    async fn add_image_url(
        &self,
        caller_id: i32,
        tool_id: i32,
        image_url: String,
    ) -> AppResult<ToolImage> {
        self.owned_tool(caller_id, tool_id, "add images to").await?;
        let image = self.uow.tools().add_image(tool_id, image_url).await?;
        tracing::info!(tool_id, image_id = image.id, "Tool image added");
        Ok(image)
    }

    async fn upload_image(
        &self,
        caller_id: i32,
        tool_id: i32,
        data: Bytes,
        mime_type: String,
    ) -> AppResult<ToolImage> {
        self.owned_tool(caller_id, tool_id, "add images to").await?;

        let url = self
            .storage
            .upload(data, &mime_type, ImageDirectory::Tools)
            .await?;
        let image = self.uow.tools().add_image(tool_id, url).await?;

        tracing::info!(tool_id, image_id = image.id, "Tool image uploaded");
        Ok(image)
    }

    async fn list_images(&self, tool_id: i32) -> AppResult<Vec<ToolImage>> {
        self.find_tool(tool_id).await?;
        self.uow.tools().images_for(&[tool_id]).await
    }

    async fn delete_image(&self, caller_id: i32, tool_id: i32, image_id: i32) -> AppResult<()> {
        self.owned_tool(caller_id, tool_id, "delete images of").await?;

        let image = self
            .uow
            .tools()
            .find_image(image_id)
            .await?
            .filter(|image| image.tool_id == tool_id)
            .ok_or_not_found("Image not found")?;

        discard_image(self.storage.as_ref(), &image.image_url).await?;
        self.uow.tools().delete_image(image.id).await?;

        tracing::info!(tool_id, image_id, "Tool image deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{MockToolRepository, MockUserRepository};
    use crate::infra::storage::MockObjectStorage;
    use crate::services::test_support::{sample_image, sample_tool, sample_user, TestUnitOfWork};

    fn service(
        users: MockUserRepository,
        tools: MockToolRepository,
        storage: MockObjectStorage,
    ) -> ToolManager<TestUnitOfWork> {
        ToolManager::new(
            Arc::new(
                TestUnitOfWork::default()
                    .with_users(users)
                    .with_tools(tools),
            ),
            Arc::new(storage),
        )
    }

    fn new_tool() -> NewTool {
        NewTool {
            name: "Drill".to_string(),
            description: None,
            category: None,
            price_per_day: 10.0,
            latitude: 50.0,
            longitude: 19.9,
        }
    }

    #[tokio::test]
    async fn test_create_tool_requires_existing_owner() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut tools = MockToolRepository::new();
        tools.expect_create().never();

        let err = service(users, tools, MockObjectStorage::new())
            .create_tool(1, new_tool())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_tool_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        let mut tools = MockToolRepository::new();
        tools
            .expect_create()
            .withf(|owner, tool| *owner == 1 && tool.name == "Drill")
            .returning(|owner, _| Ok(sample_tool(11, owner)));

        let tool = service(users, tools, MockObjectStorage::new())
            .create_tool(1, new_tool())
            .await
            .unwrap();
        assert_eq!(tool.id, 11);
        assert_eq!(tool.user_id, 1);
    }

    #[tokio::test]
    async fn test_list_tools_attaches_owner_and_images() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_ids()
            .withf(|ids| ids.to_vec() == vec![1, 2])
            .returning(|ids| Ok(ids.iter().map(|id| sample_user(*id)).collect()));
        let mut tools = MockToolRepository::new();
        tools
            .expect_list()
            .returning(|| Ok(vec![sample_tool(10, 2), sample_tool(11, 1), sample_tool(12, 2)]));
        tools.expect_images_for().returning(|_| {
            Ok(vec![
                sample_image(1, 10, "https://img/a.jpeg"),
                sample_image(2, 10, "https://img/b.jpeg"),
                sample_image(3, 12, "https://img/c.jpeg"),
            ])
        });

        let details = service(users, tools, MockObjectStorage::new())
            .list_tools()
            .await
            .unwrap();

        assert_eq!(details.len(), 3);
        assert_eq!(details[0].images.len(), 2);
        assert_eq!(details[0].owner.as_ref().unwrap().id, 2);
        assert!(details[1].images.is_empty());
        assert_eq!(details[1].owner.as_ref().unwrap().email, "user1@example.com");
        assert_eq!(details[2].images[0].id, 3);
    }

    #[tokio::test]
    async fn test_update_tool_by_non_owner_is_forbidden() {
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_tool(id, 1))));
        tools.expect_update().never();

        let err = service(MockUserRepository::new(), tools, MockObjectStorage::new())
            .update_tool(2, 10, ToolChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_tool_is_not_found() {
        let mut tools = MockToolRepository::new();
        tools.expect_find_by_id().returning(|_| Ok(None));

        let err = service(MockUserRepository::new(), tools, MockObjectStorage::new())
            .delete_tool(1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_image_of_other_tool_is_not_found() {
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_tool(id, 1))));
        tools
            .expect_find_image()
            .returning(|id| Ok(Some(sample_image(id, 99, "https://img/x.jpeg"))));
        tools.expect_delete_image().never();

        let err = service(MockUserRepository::new(), tools, MockObjectStorage::new())
            .delete_image(1, 10, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_image_skips_foreign_urls() {
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_tool(id, 1))));
        tools
            .expect_find_image()
            .returning(|id| Ok(Some(sample_image(id, 10, "https://elsewhere/x.jpeg"))));
        tools
            .expect_delete_image()
            .times(1)
            .returning(|_| Ok(()));

        let mut storage = MockObjectStorage::new();
        storage.expect_owns().returning(|_| false);
        storage.expect_delete().never();

        service(MockUserRepository::new(), tools, storage)
            .delete_image(1, 10, 5)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_image_stores_under_tools() {
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_tool(id, 1))));
        tools
            .expect_add_image()
            .withf(|tool_id, url| *tool_id == 10 && url == "https://bucket/tools/u.jpeg")
            .returning(|tool_id, url| Ok(sample_image(8, tool_id, &url)));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|_, _, dir| *dir == ImageDirectory::Tools)
            .returning(|_, _, _| Ok("https://bucket/tools/u.jpeg".to_string()));

        let image = service(MockUserRepository::new(), tools, storage)
            .upload_image(1, 10, Bytes::from_static(b"jpg"), "image/jpeg".to_string())
            .await
            .unwrap();
        assert_eq!(image.id, 8);
        assert_eq!(image.image_url, "https://bucket/tools/u.jpeg");
    }
}
