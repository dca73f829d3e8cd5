//! App Context

use std::sync::Arc;

use crate::{
    backend::{Backend, BackendConfig},
    domain::{
        issues::{IssuesService, RestIssuesService},
        orders::{OrdersService, RestOrdersService},
        products::{ProductsService, RestProductsService},
        restaurants::{RestaurantsService, RestRestaurantsService},
    },
    views::CatalogPages,
};

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub restaurants: Arc<dyn RestaurantsService>,
    pub orders: Arc<dyn OrdersService>,
    pub issues: Arc<dyn IssuesService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context talking to the configured backend.
    #[must_use]
    pub fn from_config(config: BackendConfig) -> Self {
        let backend = Backend::new(config);

        Self {
            products: Arc::new(RestProductsService::new(backend.clone())),
            restaurants: Arc::new(RestRestaurantsService::new(backend.clone())),
            orders: Arc::new(RestOrdersService::new(backend.clone())),
            issues: Arc::new(RestIssuesService::new(backend)),
        }
    }

    /// Catalog page loaders over this context's services.
    pub fn pages(&self) -> CatalogPages {
        CatalogPages::new(Arc::clone(&self.products), Arc::clone(&self.restaurants))
    }
}
