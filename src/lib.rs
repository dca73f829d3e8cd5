//! Storefront
//!
//! Client-side core of a grocery and restaurant ordering storefront: the shopping
//! cart, order pricing, checkout planning and the scripted support assistant.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod pricing;
pub mod receipt;
pub mod support;
