//! Checkout
//!
//! Turns a cart and a delivery form into the order that will be written to the
//! backend. Nothing here performs I/O; the order is only planned.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    address::{AddressError, DeliveryAddress},
    cart::{Cart, CartLineId},
    pricing::{PricingError, order_total},
};

/// Errors that prevent an order from being planned.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The delivery address is incomplete.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The order total cannot be represented in the cart currency.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How the customer intends to pay. Recorded on the order only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,

    /// Card
    Card,

    /// UPI transfer
    Upi,
}

impl PaymentMethod {
    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method name.
#[derive(Debug, Error, PartialEq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" | "cash" => Ok(PaymentMethod::Cod),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// What the customer filled in on the checkout page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutRequest {
    /// Delivery address
    pub address: DeliveryAddress,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Free-form delivery notes
    pub notes: Option<String>,
}

/// One order line, with the price copied from the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    /// Cart line the item came from
    pub line_id: CartLineId,

    /// Number of units
    pub quantity: u32,

    /// Price per unit at the time of ordering
    pub unit_price: Decimal,
}

/// An order ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    /// Cart subtotal
    pub subtotal: Money<'static, Currency>,

    /// Amount charged, subtotal plus surcharge
    pub total: Money<'static, Currency>,

    /// Single-line delivery address
    pub delivery_address: String,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Delivery notes, if any were given
    pub notes: Option<String>,

    /// One entry per cart line
    pub items: SmallVec<[PlannedItem; 8]>,
}

/// Plan the order for the given cart.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::Address`]: a required address field is blank.
/// - [`CheckoutError::Pricing`]: the totals cannot be represented.
pub fn plan_order(cart: &Cart, request: &CheckoutRequest) -> Result<OrderPlan, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    request.address.validate()?;

    let subtotal = cart.subtotal()?;
    let total = order_total(subtotal, cart.currency())?;

    let items = cart
        .iter()
        .map(|line| PlannedItem {
            line_id: line.id().clone(),
            quantity: line.quantity(),
            unit_price: line.product().price,
        })
        .collect();

    Ok(OrderPlan {
        subtotal,
        total,
        delivery_address: request.address.delivery_line(),
        payment_method: request.payment_method,
        notes: request
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
        items,
    })
}
