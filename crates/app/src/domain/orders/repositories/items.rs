//! Order Items Repository

use crate::{
    backend::{Backend, BackendError},
    domain::orders::{models::NewOrderItem, records::OrderItemRecord},
};

const ORDER_ITEMS_TABLE: &str = "order_items";

#[derive(Debug, Clone, Default)]
pub(crate) struct RestOrderItemsRepository;

impl RestOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Writes every item in a single request.
    pub(crate) async fn create_order_items(
        &self,
        backend: &Backend,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemRecord>, BackendError> {
        backend.insert(ORDER_ITEMS_TABLE, items).await
    }
}
