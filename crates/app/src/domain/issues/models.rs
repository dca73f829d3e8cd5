//! Issue Models

use serde::Serialize;
use storefront::support::{IssueCategory, IssuePriority, TicketDraft};

use crate::{domain::issues::records::IssueStatus, session::UserId};

/// New Issue Model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
}

impl NewIssue {
    /// Open ticket built from a submitted form.
    pub fn from_draft(user_id: UserId, draft: &TicketDraft) -> Self {
        Self {
            user_id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            priority: draft.priority,
            status: IssueStatus::Open,
        }
    }
}
