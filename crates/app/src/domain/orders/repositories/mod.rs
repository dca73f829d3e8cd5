//! Order Repositories

mod items;
mod orders;

pub(crate) use items::RestOrderItemsRepository;
pub(crate) use orders::RestOrdersRepository;
