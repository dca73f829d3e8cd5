//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::checkout::PaymentMethod;

use crate::{
    domain::{products::records::ProductId, restaurants::records::RestaurantFoodId},
    ids::TypedId,
    session::UserId,
};

/// Order id
pub type OrderId = TypedId<OrderRecord>;

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    /// Every order placed from the storefront starts here.
    #[default]
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default, rename = "order_items")]
    pub items: Vec<OrderItemRecord>,
}

/// Order Item id
pub type OrderItemId = TypedId<OrderItemRecord>;

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub order_id: OrderId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub restaurant_food_id: Option<RestaurantFoodId>,
    pub quantity: u32,
    pub price: Decimal,
}
