//! Orders service errors.

use thiserror::Error;

use crate::backend::{BackendError, ConstraintViolation};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("not allowed to write orders for this user")]
    Unauthorized,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for OrdersServiceError {
    fn from(error: BackendError) -> Self {
        if error.is_unauthorized() {
            return Self::Unauthorized;
        }

        match error.violation() {
            Some(ConstraintViolation::Unique) => Self::AlreadyExists,
            Some(ConstraintViolation::ForeignKey) => Self::InvalidReference,
            Some(ConstraintViolation::NotNull) => Self::MissingRequiredData,
            Some(ConstraintViolation::Check) => Self::InvalidData,
            None => Self::Backend(error),
        }
    }
}
