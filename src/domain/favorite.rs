//! Tools a user has bookmarked.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Tool, ToolImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub tool_id: i32,
}

/// Favorite tool with its images
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTool {
    #[serde(flatten)]
    pub tool: Tool,
    pub images: Vec<ToolImage>,
}

/// Favorite as listed to its owner
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDetails {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub tool: Option<FavoriteTool>,
}
