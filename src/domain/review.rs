//! Reviews users leave for each other.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i32,
    pub reviewer_user_id: i32,
    pub reviewed_user_id: i32,
    /// 1 to 5
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn is_written_by(&self, user_id: i32) -> bool {
        self.reviewer_user_id == user_id
    }
}

/// Partial review update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Review with both parties resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    #[serde(flatten)]
    pub review: Review,
    pub reviewer: Option<UserSummary>,
    pub reviewed: Option<UserSummary>,
}
