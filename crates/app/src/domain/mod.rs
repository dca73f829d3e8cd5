//! Storefront Domain Concerns

pub mod issues;
pub mod orders;
pub mod products;
pub mod restaurants;
