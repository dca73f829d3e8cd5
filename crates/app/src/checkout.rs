//! Checkout
//!
//! Turns the cart into a placed order. The order header and its items are two
//! separate writes; there is no transaction spanning them. When the items
//! write fails after the header succeeded, the error names the orphaned order.

use std::sync::Arc;

use storefront::{
    address::AddressError,
    cart::{Cart, storage::CartStorage},
    checkout::{self, CheckoutRequest, OrderPlan},
    pricing::PricingError,
};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    domain::orders::{
        OrdersService, OrdersServiceError,
        models::{NewOrder, NewOrderItem},
        records::{OrderId, OrderItemRecord, OrderRecord},
    },
    session::{AuthenticationRequired, Session},
    views::Navigation,
};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nobody is signed in.
    #[error(transparent)]
    AuthenticationRequired(#[from] AuthenticationRequired),

    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required address field is blank.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The order total cannot be represented.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing the order header failed; nothing was stored.
    #[error("failed to place order")]
    OrderFailed(#[source] OrdersServiceError),

    /// The header was stored but its items were not.
    #[error("order {order_id} was created but its items could not be saved")]
    ItemsFailed {
        /// Header left without items
        order_id: OrderId,
        /// Why the items write failed
        #[source]
        source: OrdersServiceError,
    },
}

impl From<checkout::CheckoutError> for CheckoutError {
    fn from(error: checkout::CheckoutError) -> Self {
        match error {
            checkout::CheckoutError::EmptyCart => Self::EmptyCart,
            checkout::CheckoutError::Address(error) => Self::Address(error),
            checkout::CheckoutError::Pricing(error) => Self::Pricing(error),
        }
    }
}

impl CheckoutError {
    /// Page the user should be sent to, for errors that imply a redirect.
    pub fn navigation(&self) -> Option<Navigation> {
        match self {
            Self::AuthenticationRequired(_) => Some(Navigation::Login),
            Self::EmptyCart => Some(Navigation::Cart),
            Self::Address(_)
            | Self::Pricing(_)
            | Self::OrderFailed(_)
            | Self::ItemsFailed { .. } => None,
        }
    }
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// The stored order header
    pub order: OrderRecord,

    /// The stored order items
    pub items: Vec<OrderItemRecord>,

    /// What was charged and why
    pub plan: OrderPlan,
}

impl PlacedOrder {
    /// Confirmation page for the order.
    pub fn navigation(&self) -> Navigation {
        Navigation::OrderConfirmation(self.order.id.clone())
    }
}

/// Places orders from the cart.
#[derive(Clone)]
pub struct CheckoutService {
    orders: Arc<dyn OrdersService>,
    storage: Arc<dyn CartStorage + Send + Sync>,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService").finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Create a checkout over the given orders service and cart storage.
    pub fn new(
        orders: Arc<dyn OrdersService>,
        storage: Arc<dyn CartStorage + Send + Sync>,
    ) -> Self {
        Self { orders, storage }
    }

    /// Place an order for everything in the cart.
    ///
    /// On success the cart is cleared and the cleared cart is saved. On any
    /// failure the cart is left as it was.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AuthenticationRequired`]: nobody is signed in.
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::Address`]: a required address field is blank; nothing is written.
    /// - [`CheckoutError::OrderFailed`]: the order header could not be written.
    /// - [`CheckoutError::ItemsFailed`]: the header was written but the items were not.
    pub async fn place_order(
        &self,
        session: &Session,
        cart: &mut Cart,
        request: &CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutError> {
        let user = session.require_user()?;
        let plan = checkout::plan_order(cart, request)?;

        let order = self
            .orders
            .create_order(NewOrder::from_plan(user.clone(), &plan))
            .await
            .map_err(|source| {
                error!("failed to create order: {source}");
                CheckoutError::OrderFailed(source)
            })?;

        let items = plan
            .items
            .iter()
            .map(|item| NewOrderItem::from_planned(&order.id, item))
            .collect();

        let items = self
            .orders
            .create_order_items(items)
            .await
            .map_err(|source| {
                error!(order_id = %order.id, "failed to create order items: {source}");
                CheckoutError::ItemsFailed {
                    order_id: order.id.clone(),
                    source,
                }
            })?;

        info!(
            order_id = %order.id,
            lines = items.len(),
            total = %plan.total,
            "order placed"
        );

        cart.clear();

        if let Err(source) = self.storage.save(cart) {
            error!(order_id = %order.id, "failed to save cleared cart: {source}");
        }

        Ok(PlacedOrder { order, items, plan })
    }
}
