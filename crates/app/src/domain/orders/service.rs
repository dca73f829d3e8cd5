//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    backend::Backend,
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrder, NewOrderItem},
        records::{OrderId, OrderItemRecord, OrderRecord},
        repositories::{RestOrderItemsRepository, RestOrdersRepository},
    },
    session::UserId,
};

#[derive(Debug, Clone)]
pub struct RestOrdersService {
    backend: Backend,
    orders_repository: RestOrdersRepository,
    items_repository: RestOrderItemsRepository,
}

impl RestOrdersService {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            orders_repository: RestOrdersRepository::new(),
            items_repository: RestOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for RestOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        let created = self
            .orders_repository
            .create_order(&self.backend, &order)
            .await?;

        Ok(created)
    }

    async fn create_order_items(
        &self,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItemRecord>, OrdersServiceError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let created = self
            .items_repository
            .create_order_items(&self.backend, &items)
            .await?;

        Ok(created)
    }

    async fn get_order(
        &self,
        order: OrderId,
        user: UserId,
    ) -> Result<OrderRecord, OrdersServiceError> {
        self.orders_repository
            .get_order(&self.backend, &order, &user)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(&self, user: UserId) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let orders = self
            .orders_repository
            .list_orders(&self.backend, &user)
            .await?;

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Creates an order header.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// Creates the line items of an existing order.
    async fn create_order_items(
        &self,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItemRecord>, OrdersServiceError>;

    /// Retrieve one of the user's orders together with its items.
    async fn get_order(
        &self,
        order: OrderId,
        user: UserId,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieves the user's orders, newest first.
    async fn list_orders(&self, user: UserId) -> Result<Vec<OrderRecord>, OrdersServiceError>;
}
