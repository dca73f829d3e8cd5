//! Issues service errors.

use thiserror::Error;

use crate::backend::{BackendError, ConstraintViolation};

#[derive(Debug, Error)]
pub enum IssuesServiceError {
    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("not allowed to open tickets for this user")]
    Unauthorized,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for IssuesServiceError {
    fn from(error: BackendError) -> Self {
        if error.is_unauthorized() {
            return Self::Unauthorized;
        }

        match error.violation() {
            Some(ConstraintViolation::NotNull) => Self::MissingRequiredData,
            Some(ConstraintViolation::Check) => Self::InvalidData,
            Some(ConstraintViolation::Unique | ConstraintViolation::ForeignKey) | None => {
                Self::Backend(error)
            }
        }
    }
}
