//! Order Models

use rust_decimal::Decimal;
use serde::Serialize;
use storefront::{
    cart::LineSource,
    checkout::{OrderPlan, PaymentMethod, PlannedItem},
    pricing,
};

use crate::{
    domain::{
        orders::records::{OrderId, OrderStatus},
        products::records::ProductId,
        restaurants::records::RestaurantFoodId,
    },
    session::UserId,
};

/// New Order Model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl NewOrder {
    /// Order header for a planned checkout.
    pub fn from_plan(user_id: UserId, plan: &OrderPlan) -> Self {
        Self {
            user_id,
            total_amount: pricing::amount(&plan.total),
            status: OrderStatus::Confirmed,
            delivery_address: plan.delivery_address.clone(),
            payment_method: plan.payment_method,
            notes: plan.notes.clone(),
        }
    }
}

/// New Order Item Model
///
/// Exactly one of `product_id` and `restaurant_food_id` is set. Both keys are
/// always serialized so a batch insert sends rows of the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub restaurant_food_id: Option<RestaurantFoodId>,
    pub quantity: u32,
    pub price: Decimal,
}

impl NewOrderItem {
    /// Order item for a planned line.
    pub fn from_planned(order_id: &OrderId, item: &PlannedItem) -> Self {
        let (product_id, restaurant_food_id) = match item.line_id.source() {
            LineSource::Product(id) => (Some(ProductId::new(id)), None),
            LineSource::RestaurantFood(id) => (None, Some(RestaurantFoodId::new(id))),
        };

        Self {
            order_id: order_id.clone(),
            product_id,
            restaurant_food_id,
            quantity: item.quantity,
            price: item.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use rusty_money::iso;
    use serde_json::json;
    use smallvec::smallvec;
    use storefront::cart::CartLineId;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn header_carries_rounded_total_and_confirmed_status() -> TestResult {
        let plan = OrderPlan {
            subtotal: pricing::money(dec!(9.98), iso::INR)?,
            total: pricing::money(dec!(10.978), iso::INR)?,
            delivery_address: "1 Main St".to_string(),
            payment_method: PaymentMethod::Upi,
            notes: Some("ring twice".to_string()),
            items: smallvec![],
        };

        let order = NewOrder::from_plan(UserId::new("u-1"), &plan);

        assert_eq!(
            serde_json::to_value(&order)?,
            json!({
                "user_id": "u-1",
                "total_amount": "10.98",
                "status": "confirmed",
                "delivery_address": "1 Main St",
                "payment_method": "upi",
                "notes": "ring twice",
            })
        );

        Ok(())
    }

    #[test]
    fn restaurant_lines_reference_the_food_row() -> TestResult {
        let order_id = OrderId::new("o-1");

        let product = NewOrderItem::from_planned(
            &order_id,
            &PlannedItem {
                line_id: CartLineId::product("v1"),
                quantity: 2,
                unit_price: dec!(4.99),
            },
        );

        let food = NewOrderItem::from_planned(
            &order_id,
            &PlannedItem {
                line_id: CartLineId::restaurant_food("7"),
                quantity: 1,
                unit_price: dec!(120),
            },
        );

        assert_eq!(product.product_id, Some(ProductId::new("v1")));
        assert_eq!(product.restaurant_food_id, None);
        assert_eq!(food.product_id, None);
        assert_eq!(food.restaurant_food_id, Some(RestaurantFoodId::new("7")));

        assert_eq!(
            serde_json::to_value(&food)?,
            json!({
                "order_id": "o-1",
                "product_id": null,
                "restaurant_food_id": "7",
                "quantity": 1,
                "price": "120",
            })
        );

        Ok(())
    }
}
