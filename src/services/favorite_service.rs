//! Favorite service - Tools a user bookmarked.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Favorite, FavoriteDetails, FavoriteTool, ToolImage};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait FavoriteService: Send + Sync {
    async fn add_favorite(&self, user_id: i32, tool_id: i32) -> AppResult<Favorite>;

    /// The caller's favorites with tool and images
    async fn list_favorites(&self, user_id: i32) -> AppResult<Vec<FavoriteDetails>>;

    /// Owner-only delete
    async fn remove_favorite(&self, caller_id: i32, id: i32) -> AppResult<()>;
}

pub struct FavoriteManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FavoriteManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FavoriteService for FavoriteManager<U> {
    async fn add_favorite(&self, user_id: i32, tool_id: i32) -> AppResult<Favorite> {
        self.uow
            .tools()
            .find_by_id(tool_id)
            .await?
            .ok_or_not_found("Tool not found")?;

        if self
            .uow
            .favorites()
            .find_for(user_id, tool_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Tool is already in favorites"));
        }

        let favorite = self.uow.favorites().create(user_id, tool_id).await?;
        tracing::info!(user_id, tool_id, favorite_id = favorite.id, "Favorite added");
        Ok(favorite)
    }

    async fn list_favorites(&self, user_id: i32) -> AppResult<Vec<FavoriteDetails>> {
        let favorites = self.uow.favorites().list_for_user(user_id).await?;
        let tool_ids: Vec<i32> = favorites.iter().map(|f| f.tool_id).collect();

        let tool_repo = self.uow.tools();
        let (tools, images) = tokio::try_join!(
            tool_repo.find_by_ids(&tool_ids),
            tool_repo.images_for(&tool_ids),
        )?;

        let mut images_by_tool: HashMap<i32, Vec<ToolImage>> = HashMap::new();
        for image in images {
            images_by_tool.entry(image.tool_id).or_default().push(image);
        }
        let tools: HashMap<i32, FavoriteTool> = tools
            .into_iter()
            .map(|tool| {
                let images = images_by_tool.remove(&tool.id).unwrap_or_default();
                (tool.id, FavoriteTool { tool, images })
            })
            .collect();

        Ok(favorites
            .into_iter()
            .map(|favorite| FavoriteDetails {
                tool: tools.get(&favorite.tool_id).cloned(),
                favorite,
            })
            .collect())
    }

    async fn remove_favorite(&self, caller_id: i32, id: i32) -> AppResult<()> {
        let favorite = self
            .uow
            .favorites()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Favorite not found")?;

        if favorite.user_id != caller_id {
            tracing::warn!(user_id = caller_id, favorite_id = id, "Favorite access denied");
            return Err(AppError::forbidden(
                "You are not allowed to delete this favorite",
            ));
        }

        self.uow.favorites().delete(id).await?;
        tracing::info!(user_id = caller_id, favorite_id = id, "Favorite removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{MockFavoriteRepository, MockToolRepository};
    use crate::services::test_support::{sample_image, sample_tool, TestUnitOfWork};

    fn service(
        tools: MockToolRepository,
        favorites: MockFavoriteRepository,
    ) -> FavoriteManager<TestUnitOfWork> {
        FavoriteManager::new(Arc::new(
            TestUnitOfWork::default()
                .with_tools(tools)
                .with_favorites(favorites),
        ))
    }

    #[tokio::test]
    async fn test_add_favorite_for_missing_tool() {
        let mut tools = MockToolRepository::new();
        tools.expect_find_by_id().returning(|_| Ok(None));

        let err = service(tools, MockFavoriteRepository::new())
            .add_favorite(1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_duplicate_favorite_is_conflict() {
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_tool(id, 2))));
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_find_for().returning(|user_id, tool_id| {
            Ok(Some(Favorite {
                id: 1,
                user_id,
                tool_id,
            }))
        });
        favorites.expect_create().never();

        let err = service(tools, favorites)
            .add_favorite(1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_favorites_with_tool_images() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_list_for_user().returning(|user_id| {
            Ok(vec![
                Favorite { id: 1, user_id, tool_id: 10 },
                Favorite { id: 2, user_id, tool_id: 11 },
            ])
        });
        let mut tools = MockToolRepository::new();
        tools
            .expect_find_by_ids()
            .returning(|_| Ok(vec![sample_tool(10, 5), sample_tool(11, 6)]));
        tools
            .expect_images_for()
            .returning(|_| Ok(vec![sample_image(1, 11, "https://img/a.jpeg")]));

        let list = service(tools, favorites).list_favorites(3).await.unwrap();

        assert_eq!(list.len(), 2);
        assert!(list[0].tool.as_ref().unwrap().images.is_empty());
        assert_eq!(list[1].tool.as_ref().unwrap().images.len(), 1);
        assert_eq!(list[1].favorite.user_id, 3);
    }

    #[tokio::test]
    async fn test_remove_foreign_favorite_is_forbidden() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_find_by_id().returning(|id| {
            Ok(Some(Favorite {
                id,
                user_id: 2,
                tool_id: 10,
            }))
        });
        favorites.expect_delete().never();

        let err = service(MockToolRepository::new(), favorites)
            .remove_favorite(1, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_favorite_is_not_found() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_find_by_id().returning(|_| Ok(None));

        let err = service(MockToolRepository::new(), favorites)
            .remove_favorite(1, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
