//! Orders

pub mod errors;
pub mod models;
pub mod records;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
