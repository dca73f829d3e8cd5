//! Restaurants service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    backend::Backend,
    domain::restaurants::{
        errors::RestaurantsServiceError,
        records::{RestaurantFoodRecord, RestaurantId, RestaurantRecord},
        repository::RestRestaurantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct RestRestaurantsService {
    backend: Backend,
    repository: RestRestaurantsRepository,
}

impl RestRestaurantsService {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            repository: RestRestaurantsRepository::new(),
        }
    }
}

#[async_trait]
impl RestaurantsService for RestRestaurantsService {
    async fn list_restaurants(&self) -> Result<Vec<RestaurantRecord>, RestaurantsServiceError> {
        let restaurants = self.repository.list_restaurants(&self.backend).await?;

        Ok(restaurants)
    }

    async fn get_restaurant(
        &self,
        restaurant: RestaurantId,
    ) -> Result<RestaurantRecord, RestaurantsServiceError> {
        self.repository
            .get_restaurant(&self.backend, &restaurant)
            .await?
            .ok_or(RestaurantsServiceError::NotFound)
    }

    async fn list_menu(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Vec<RestaurantFoodRecord>, RestaurantsServiceError> {
        let menu = self
            .repository
            .list_menu(&self.backend, &restaurant)
            .await?;

        Ok(menu)
    }
}

#[automock]
#[async_trait]
pub trait RestaurantsService: Send + Sync {
    /// Retrieves all restaurants, ordered by name.
    async fn list_restaurants(&self) -> Result<Vec<RestaurantRecord>, RestaurantsServiceError>;

    /// Retrieve a single restaurant.
    async fn get_restaurant(
        &self,
        restaurant: RestaurantId,
    ) -> Result<RestaurantRecord, RestaurantsServiceError>;

    /// Retrieves a restaurant's menu items, ordered by name.
    async fn list_menu(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Vec<RestaurantFoodRecord>, RestaurantsServiceError>;
}
