//! Restaurants Repository

use crate::{
    backend::{Backend, BackendError, Query},
    domain::restaurants::records::{RestaurantFoodRecord, RestaurantId, RestaurantRecord},
};

const RESTAURANTS_TABLE: &str = "restaurants";
const RESTAURANT_FOODS_TABLE: &str = "restaurant_foods";

#[derive(Debug, Clone, Default)]
pub(crate) struct RestRestaurantsRepository;

impl RestRestaurantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn menu_query(restaurant: &RestaurantId) -> Query {
        Query::new()
            .select("*")
            .eq("restaurant_id", restaurant.as_str())
            .order_asc("name")
    }

    pub(crate) async fn list_restaurants(
        &self,
        backend: &Backend,
    ) -> Result<Vec<RestaurantRecord>, BackendError> {
        let query = Query::new().select("*").order_asc("name");

        backend.select(RESTAURANTS_TABLE, &query).await
    }

    pub(crate) async fn get_restaurant(
        &self,
        backend: &Backend,
        restaurant: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, BackendError> {
        let query = Query::new()
            .select("*")
            .eq("id", restaurant.as_str())
            .limit(1);

        let rows: Vec<RestaurantRecord> = backend.select(RESTAURANTS_TABLE, &query).await?;

        Ok(rows.into_iter().next())
    }

    pub(crate) async fn list_menu(
        &self,
        backend: &Backend,
        restaurant: &RestaurantId,
    ) -> Result<Vec<RestaurantFoodRecord>, BackendError> {
        backend
            .select(RESTAURANT_FOODS_TABLE, &Self::menu_query(restaurant))
            .await
    }
}
