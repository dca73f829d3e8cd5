//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    backend::Backend,
    domain::products::{
        errors::ProductsServiceError,
        records::{ProductId, ProductRecord},
        repository::RestProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct RestProductsService {
    backend: Backend,
    repository: RestProductsRepository,
}

impl RestProductsService {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            repository: RestProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for RestProductsService {
    async fn list_products(
        &self,
        category: Option<String>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let products = self
            .repository
            .list_products(&self.backend, category.as_deref())
            .await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError> {
        self.repository
            .get_product(&self.backend, &product)
            .await?
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn list_keywords(&self, product: ProductId) -> Result<Vec<String>, ProductsServiceError> {
        let keywords = self
            .repository
            .list_keywords(&self.backend, &product)
            .await?;

        Ok(keywords.into_iter().map(|record| record.keyword).collect())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves the products in a category, or every product when no category is given.
    async fn list_products(
        &self,
        category: Option<String>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve the search keywords attached to a product.
    async fn list_keywords(&self, product: ProductId) -> Result<Vec<String>, ProductsServiceError>;
}
