//! Storefront application layer: backend services, checkout, support chat and page state.

pub mod backend;
pub mod checkout;
pub mod config;
pub mod context;
pub mod domain;
pub mod ids;
pub mod observability;
pub mod session;
pub mod support;
pub mod views;
