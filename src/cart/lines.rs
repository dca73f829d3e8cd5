//! Cart Lines

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{PricingError, line_total};

/// Prefix of a displayed restaurant menu item line.
pub const RESTAURANT_FOOD_PREFIX: &str = "restaurant-food:";

/// Identifier of a cart line.
///
/// Grocery products and restaurant menu items live in separate namespaces, so
/// the two catalogs never collide even when their raw ids are equal. The
/// displayed form of a menu item is `restaurant-food:<food id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CartLineId {
    /// Grocery product id.
    Product(String),

    /// Restaurant menu item id.
    RestaurantFood(String),
}

impl CartLineId {
    /// Line identifier for a grocery product.
    pub fn product(product_id: impl Into<String>) -> Self {
        Self::Product(product_id.into())
    }

    /// Line identifier for a restaurant menu item.
    pub fn restaurant_food(food_id: impl Into<String>) -> Self {
        Self::RestaurantFood(food_id.into())
    }

    /// Where the line came from.
    pub fn source(&self) -> LineSource<'_> {
        match self {
            Self::Product(id) => LineSource::Product(id),
            Self::RestaurantFood(id) => LineSource::RestaurantFood(id),
        }
    }
}

impl Display for CartLineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Product(id) => f.write_str(id),
            Self::RestaurantFood(id) => write!(f, "{RESTAURANT_FOOD_PREFIX}{id}"),
        }
    }
}

/// Catalog entry a cart line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource<'a> {
    /// Grocery product id.
    Product(&'a str),

    /// Restaurant menu item id.
    RestaurantFood(&'a str),
}

/// Product fields copied into the cart when the line is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Catalog category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Selling unit, e.g. "500 g"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Product type, e.g. "veg"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Restaurant the item is sold by, for menu items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

impl CartProduct {
    /// Snapshot with only a name and a price.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            category: None,
            image: None,
            unit: None,
            brand: None,
            kind: None,
            restaurant_id: None,
        }
    }
}

/// A single entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    id: CartLineId,
    product: CartProduct,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(id: CartLineId, product: CartProduct) -> Self {
        Self {
            id,
            product,
            quantity: 1,
        }
    }

    /// Line identifier
    pub fn id(&self) -> &CartLineId {
        &self.id
    }

    /// Product snapshot taken when the line was created
    pub fn product(&self) -> &CartProduct {
        &self.product
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product does not fit in a decimal.
    pub fn total(&self) -> Result<Decimal, PricingError> {
        line_total(self.product.price, self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
