//! Products service errors.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("backend error")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for ProductsServiceError {
    fn from(error: BackendError) -> Self {
        Self::Backend(error)
    }
}
