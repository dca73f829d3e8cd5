//! Issues service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    backend::Backend,
    domain::issues::{
        errors::IssuesServiceError, models::NewIssue, records::IssueRecord,
        repository::RestIssuesRepository,
    },
    session::UserId,
};

#[derive(Debug, Clone)]
pub struct RestIssuesService {
    backend: Backend,
    repository: RestIssuesRepository,
}

impl RestIssuesService {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            repository: RestIssuesRepository::new(),
        }
    }
}

#[async_trait]
impl IssuesService for RestIssuesService {
    async fn create_issue(&self, issue: NewIssue) -> Result<IssueRecord, IssuesServiceError> {
        let created = self.repository.create_issue(&self.backend, &issue).await?;

        Ok(created)
    }

    async fn list_issues(&self, user: UserId) -> Result<Vec<IssueRecord>, IssuesServiceError> {
        let issues = self.repository.list_issues(&self.backend, &user).await?;

        Ok(issues)
    }
}

#[automock]
#[async_trait]
pub trait IssuesService: Send + Sync {
    /// Opens a support ticket.
    async fn create_issue(&self, issue: NewIssue) -> Result<IssueRecord, IssuesServiceError>;

    /// Retrieves the user's tickets, newest first.
    async fn list_issues(&self, user: UserId) -> Result<Vec<IssueRecord>, IssuesServiceError>;
}
