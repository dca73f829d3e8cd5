//! Orders Repository

use crate::{
    backend::{Backend, BackendError, Query},
    domain::orders::{
        models::NewOrder,
        records::{OrderId, OrderRecord},
    },
    session::UserId,
};

const ORDERS_TABLE: &str = "orders";

#[derive(Debug, Clone, Default)]
pub(crate) struct RestOrdersRepository;

impl RestOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn get_order_query(order: &OrderId, user: &UserId) -> Query {
        Query::new()
            .select("*,order_items(*)")
            .eq("id", order.as_str())
            .eq("user_id", user.as_str())
    }

    pub(crate) async fn create_order(
        &self,
        backend: &Backend,
        order: &NewOrder,
    ) -> Result<OrderRecord, BackendError> {
        let rows: Vec<OrderRecord> = backend.insert(ORDERS_TABLE, order).await?;

        rows.into_iter().next().ok_or_else(|| {
            BackendError::UnexpectedResponse("order insert returned no rows".to_string())
        })
    }

    pub(crate) async fn get_order(
        &self,
        backend: &Backend,
        order: &OrderId,
        user: &UserId,
    ) -> Result<Option<OrderRecord>, BackendError> {
        let rows: Vec<OrderRecord> = backend
            .select(ORDERS_TABLE, &Self::get_order_query(order, user))
            .await?;

        Ok(rows.into_iter().next())
    }

    pub(crate) async fn list_orders(
        &self,
        backend: &Backend,
        user: &UserId,
    ) -> Result<Vec<OrderRecord>, BackendError> {
        let query = Query::new()
            .select("*,order_items(*)")
            .eq("user_id", user.as_str())
            .order_desc("created_at");

        backend.select(ORDERS_TABLE, &query).await
    }
}
