//! Tool listings and their images.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::UserSummary;

/// A tool offered for rent
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_day: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tool {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Image attached to a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolImage {
    pub id: i32,
    pub tool_id: i32,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tool creation data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTool {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_day: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial tool update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_day: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Tool with its owner and images, as listed to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetails {
    #[serde(flatten)]
    pub tool: Tool,
    pub owner: Option<UserSummary>,
    pub images: Vec<ToolImage>,
}
