//! Issues Repository

use crate::{
    backend::{Backend, BackendError, Query},
    domain::issues::{models::NewIssue, records::IssueRecord},
    session::UserId,
};

const ISSUES_TABLE: &str = "issues";

#[derive(Debug, Clone, Default)]
pub(crate) struct RestIssuesRepository;

impl RestIssuesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn list_issues_query(user: &UserId) -> Query {
        Query::new()
            .select("*")
            .eq("user_id", user.as_str())
            .order_desc("created_at")
    }

    pub(crate) async fn create_issue(
        &self,
        backend: &Backend,
        issue: &NewIssue,
    ) -> Result<IssueRecord, BackendError> {
        let rows: Vec<IssueRecord> = backend.insert(ISSUES_TABLE, issue).await?;

        rows.into_iter().next().ok_or_else(|| {
            BackendError::UnexpectedResponse("issue insert returned no rows".to_string())
        })
    }

    pub(crate) async fn list_issues(
        &self,
        backend: &Backend,
        user: &UserId,
    ) -> Result<Vec<IssueRecord>, BackendError> {
        backend
            .select(ISSUES_TABLE, &Self::list_issues_query(user))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_listing_is_scoped_to_user_newest_first() {
        let query = RestIssuesRepository::list_issues_query(&UserId::new("u-1"));

        assert_eq!(
            query.params(),
            [
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }
}
