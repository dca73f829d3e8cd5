//! Integration test for the cart-to-order flow.
//!
//! A customer fills a cart with grocery products and a restaurant dish, the
//! cart survives a restart through the JSON file, and the planned order
//! carries the same total the receipt shows.
//!
//! Cart:
//!
//! - Tomatoes: ₹4.99 × 2 = ₹9.98
//! - Milk: ₹2.50 × 1 = ₹2.50 (added three times, decremented twice)
//! - Masala Dosa: ₹120.00 × 1 = ₹120.00
//!
//! Subtotal: ₹132.48, surcharge 10%: ₹13.248, total: ₹145.73 (rounded)

use rust_decimal::dec;
use rusty_money::{Money, iso};
use testresult::TestResult;

use storefront::{
    address::DeliveryAddress,
    cart::{
        Cart, CartLineId, CartProduct, LineSource,
        storage::{CartStorage, JsonFileStorage},
    },
    checkout::{CheckoutRequest, PaymentMethod, plan_order},
    receipt::Receipt,
};

fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "12 MG Road".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        zip: "411001".to_string(),
        phone: "9876543210".to_string(),
        landmark: Some("Opp. City Mall".to_string()),
        alternate_phone: None,
    }
}

fn fill(cart: &mut Cart) -> TestResult {
    let tomatoes = CartLineId::product("v1");
    let milk = CartLineId::product("d3");

    cart.add(tomatoes.clone(), CartProduct::new("Tomatoes", dec!(4.99)));
    cart.add(tomatoes, CartProduct::new("Tomatoes", dec!(4.99)));

    for _ in 0..3 {
        cart.add(milk.clone(), CartProduct::new("Milk", dec!(2.50)));
    }

    cart.decrement(&milk)?;
    cart.decrement(&milk)?;

    cart.add(
        CartLineId::restaurant_food("7"),
        CartProduct {
            restaurant_id: Some("r-1".to_string()),
            ..CartProduct::new("Masala Dosa", dec!(120.00))
        },
    );

    Ok(())
}

#[test]
fn test_cart_survives_restart_and_plans_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = JsonFileStorage::new(dir.path().join("cart.json"));

    let mut cart = storage.load(iso::INR)?;
    assert!(cart.is_empty());

    fill(&mut cart)?;
    storage.save(&cart)?;

    let restored = storage.load(iso::INR)?;

    assert_eq!(restored, cart);
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.item_count(), 4);
    assert_eq!(restored.subtotal()?, Money::from_minor(132_48, iso::INR));

    let request = CheckoutRequest {
        address: address(),
        payment_method: PaymentMethod::Upi,
        notes: Some("  Leave at the gate ".to_string()),
    };

    let plan = plan_order(&restored, &request)?;
    let receipt = Receipt::from_cart(&restored)?;

    assert_eq!(plan.total, Money::from_minor(145_73, iso::INR));
    assert_eq!(plan.total, receipt.total());
    assert_eq!(plan.notes.as_deref(), Some("Leave at the gate"));
    assert_eq!(
        plan.delivery_address,
        "12 MG Road, Pune, MH - 411001 (Landmark: Opp. City Mall) | Phone: 9876543210"
    );

    let sources: Vec<LineSource<'_>> = plan.items.iter().map(|item| item.line_id.source()).collect();

    assert_eq!(
        sources,
        [
            LineSource::Product("v1"),
            LineSource::Product("d3"),
            LineSource::RestaurantFood("7"),
        ]
    );

    Ok(())
}

#[test]
fn test_total_matches_line_sums_after_mixed_edits() -> TestResult {
    let mut cart = Cart::new(iso::INR);

    fill(&mut cart)?;

    cart.update_quantity(&CartLineId::product("v1"), 5)?;
    cart.update_quantity(&CartLineId::product("d3"), 0)?;
    assert!(cart.remove(&CartLineId::restaurant_food("7")));
    cart.add(CartLineId::product("b2"), CartProduct::new("Bread", dec!(1.25)));

    let expected: rust_decimal::Decimal = cart
        .iter()
        .map(|line| line.product().price * rust_decimal::Decimal::from(line.quantity()))
        .sum();

    assert_eq!(expected, dec!(26.20));
    assert_eq!(cart.subtotal_amount()?, expected);
    assert!(cart.get(&CartLineId::product("d3")).is_none());

    Ok(())
}

#[test]
fn test_saved_cart_in_other_currency_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = JsonFileStorage::new(dir.path().join("cart.json"));

    let mut cart = Cart::new(iso::USD);
    fill(&mut cart)?;
    storage.save(&cart)?;

    assert!(storage.load(iso::INR).is_err());

    Ok(())
}
