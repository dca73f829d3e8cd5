//! Restaurant Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::cart::{CartLineId, CartProduct};

use crate::ids::TypedId;

/// Restaurant id
pub type RestaurantId = TypedId<RestaurantRecord>;

/// Restaurant Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "cuisine_type")]
    pub cuisine: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub delivery_time: Option<String>,
}

/// Restaurant food id
pub type RestaurantFoodId = TypedId<RestaurantFoodRecord>;

/// Restaurant Food Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantFoodRecord {
    pub id: RestaurantFoodId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "available_by_default", alias = "is_available")]
    pub available: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

fn available_by_default() -> bool {
    true
}

impl RestaurantFoodRecord {
    /// Cart line this menu item is added under.
    pub fn cart_line_id(&self) -> CartLineId {
        CartLineId::restaurant_food(self.id.as_str())
    }

    /// Snapshot of the menu item kept on its cart line.
    pub fn cart_product(&self) -> CartProduct {
        CartProduct {
            category: self.category.clone(),
            image: self.image.clone(),
            restaurant_id: Some(self.restaurant_id.to_string()),
            ..CartProduct::new(self.name.clone(), self.price)
        }
    }
}
