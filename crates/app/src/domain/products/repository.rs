//! Products Repository

use crate::{
    backend::{Backend, BackendError, Query},
    domain::products::records::{ProductId, ProductKeywordRecord, ProductRecord},
};

const PRODUCTS_TABLE: &str = "products";
const PRODUCT_KEYWORDS_TABLE: &str = "product_keywords";

#[derive(Debug, Clone, Default)]
pub(crate) struct RestProductsRepository;

impl RestProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn list_products_query(category: Option<&str>) -> Query {
        let query = Query::new().select("*");

        match category {
            Some(category) => query.eq("category", category),
            None => query,
        }
    }

    pub(crate) async fn list_products(
        &self,
        backend: &Backend,
        category: Option<&str>,
    ) -> Result<Vec<ProductRecord>, BackendError> {
        backend
            .select(PRODUCTS_TABLE, &Self::list_products_query(category))
            .await
    }

    pub(crate) async fn get_product(
        &self,
        backend: &Backend,
        product: &ProductId,
    ) -> Result<Option<ProductRecord>, BackendError> {
        let query = Query::new().select("*").eq("id", product.as_str()).limit(1);

        let rows: Vec<ProductRecord> = backend.select(PRODUCTS_TABLE, &query).await?;

        Ok(rows.into_iter().next())
    }

    pub(crate) async fn list_keywords(
        &self,
        backend: &Backend,
        product: &ProductId,
    ) -> Result<Vec<ProductKeywordRecord>, BackendError> {
        let query = Query::new()
            .select("product_id,keyword")
            .eq("product_id", product.as_str());

        backend.select(PRODUCT_KEYWORDS_TABLE, &query).await
    }
}
