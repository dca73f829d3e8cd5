//! Issue Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use storefront::support::{IssueCategory, IssuePriority};

use crate::{ids::TypedId, session::UserId};

/// Issue id
pub type IssueId = TypedId<IssueRecord>;

/// Where a support ticket is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// New tickets start here.
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// Issue Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: IssueId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}
