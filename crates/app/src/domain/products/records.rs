//! Product Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::cart::{CartLineId, CartProduct};

use crate::{domain::restaurants::records::RestaurantId, ids::TypedId};

/// Product id
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Cart line this product is added under.
    pub fn cart_line_id(&self) -> CartLineId {
        CartLineId::product(self.id.as_str())
    }

    /// Snapshot of the product kept on its cart line.
    pub fn cart_product(&self) -> CartProduct {
        CartProduct {
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            image: self.image.clone(),
            unit: self.unit.clone(),
            brand: self.brand.clone(),
            kind: self.kind.clone(),
            restaurant_id: self.restaurant_id.as_ref().map(ToString::to_string),
        }
    }
}

/// Product Keyword Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductKeywordRecord {
    pub product_id: ProductId,
    pub keyword: String,
}
