//! Views
//!
//! View state for the storefront pages. Loaders never fail: a read error is
//! logged, reported as an error toast and leaves the page [`Loadable::Empty`].
//! Retrying is left to the user.

use std::sync::Arc;

use tracing::warn;

use crate::{
    domain::{
        orders::{
            OrdersService, OrdersServiceError,
            records::{OrderId, OrderRecord},
        },
        products::{
            ProductsService, ProductsServiceError,
            records::{ProductId, ProductRecord},
        },
        restaurants::{
            RestaurantsService, RestaurantsServiceError,
            records::{RestaurantFoodRecord, RestaurantId, RestaurantRecord},
        },
    },
    session::{AuthenticationRequired, Session},
};

/// Data behind a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    /// The request has not finished.
    #[default]
    Loading,

    /// Nothing to show, either because there is no data or because loading failed.
    Empty,

    /// The data arrived.
    Ready(T),
}

impl<T> Loadable<Vec<T>> {
    /// `Empty` for an empty listing, `Ready` otherwise.
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Ready(items)
        }
    }
}

impl<T> Loadable<T> {
    /// Loaded data, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Empty => None,
        }
    }

    /// Whether the page is still waiting for data.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Something worked
    Success,
    /// Something failed
    Error,
}

/// Short-lived notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity
    pub kind: ToastKind,
    /// Text shown to the user
    pub message: String,
}

/// Queue of notifications waiting to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toasts {
    toasts: Vec<Toast>,
}

impl Toasts {
    /// Queue a success notification.
    pub fn success(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast {
            kind: ToastKind::Success,
            message: message.into(),
        });
    }

    /// Queue an error notification.
    pub fn error(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast {
            kind: ToastKind::Error,
            message: message.into(),
        });
    }

    /// Queued notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Take every queued notification.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Page the storefront should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The cart view
    Cart,
    /// The sign-in view
    Login,
    /// Confirmation of a placed order
    OrderConfirmation(OrderId),
}

impl From<AuthenticationRequired> for Navigation {
    fn from(_: AuthenticationRequired) -> Self {
        Self::Login
    }
}

/// A product with its search keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// The product
    pub product: ProductRecord,
    /// Keywords, empty when none could be loaded
    pub keywords: Vec<String>,
}

/// A restaurant with its menu.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantPage {
    /// The restaurant
    pub restaurant: RestaurantRecord,
    /// Menu items ordered by name
    pub menu: Vec<RestaurantFoodRecord>,
}

/// Loaders for the catalog pages.
#[derive(Clone)]
pub struct CatalogPages {
    products: Arc<dyn ProductsService>,
    restaurants: Arc<dyn RestaurantsService>,
}

impl std::fmt::Debug for CatalogPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogPages").finish_non_exhaustive()
    }
}

impl CatalogPages {
    /// Create page loaders over the given services.
    pub fn new(
        products: Arc<dyn ProductsService>,
        restaurants: Arc<dyn RestaurantsService>,
    ) -> Self {
        Self {
            products,
            restaurants,
        }
    }

    /// Products in a category, or every product.
    pub async fn category(
        &self,
        category: Option<&str>,
        toasts: &mut Toasts,
    ) -> Loadable<Vec<ProductRecord>> {
        match self.products.list_products(category.map(str::to_string)).await {
            Ok(products) => Loadable::from_items(products),
            Err(source) => {
                warn!(category, "failed to load products: {source}");
                toasts.error("Failed to load products");
                Loadable::Empty
            }
        }
    }

    /// A product, then its keywords. Missing keywords do not fail the page.
    pub async fn product(&self, product: ProductId, toasts: &mut Toasts) -> Loadable<ProductPage> {
        let record = match self.products.get_product(product.clone()).await {
            Ok(record) => record,
            Err(ProductsServiceError::NotFound) => {
                toasts.error("Product not found");
                return Loadable::Empty;
            }
            Err(source) => {
                warn!(%product, "failed to load product: {source}");
                toasts.error("Failed to load product");
                return Loadable::Empty;
            }
        };

        let keywords = self
            .products
            .list_keywords(product.clone())
            .await
            .unwrap_or_else(|source| {
                warn!(%product, "failed to load product keywords: {source}");
                Vec::new()
            });

        Loadable::Ready(ProductPage {
            product: record,
            keywords,
        })
    }

    /// Every restaurant, ordered by name.
    pub async fn restaurants(&self, toasts: &mut Toasts) -> Loadable<Vec<RestaurantRecord>> {
        match self.restaurants.list_restaurants().await {
            Ok(restaurants) => Loadable::from_items(restaurants),
            Err(source) => {
                warn!("failed to load restaurants: {source}");
                toasts.error("Failed to load restaurants");
                Loadable::Empty
            }
        }
    }

    /// A restaurant and its menu.
    pub async fn restaurant(
        &self,
        restaurant: RestaurantId,
        toasts: &mut Toasts,
    ) -> Loadable<RestaurantPage> {
        let record = match self.restaurants.get_restaurant(restaurant.clone()).await {
            Ok(record) => record,
            Err(RestaurantsServiceError::NotFound) => {
                toasts.error("Restaurant not found");
                return Loadable::Empty;
            }
            Err(source) => {
                warn!(%restaurant, "failed to load restaurant: {source}");
                toasts.error("Failed to load restaurant");
                return Loadable::Empty;
            }
        };

        match self.restaurants.list_menu(restaurant.clone()).await {
            Ok(menu) => Loadable::Ready(RestaurantPage {
                restaurant: record,
                menu,
            }),
            Err(source) => {
                warn!(%restaurant, "failed to load menu: {source}");
                toasts.error("Failed to load menu");
                Loadable::Empty
            }
        }
    }
}

/// Order confirmation page, with a manual retry.
pub struct OrderConfirmationPage {
    orders: Arc<dyn OrdersService>,
    order: OrderId,
    state: Loadable<OrderRecord>,
}

impl std::fmt::Debug for OrderConfirmationPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderConfirmationPage")
            .field("order", &self.order)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl OrderConfirmationPage {
    /// Page for the given order; nothing is fetched until [`Self::load`].
    pub fn new(orders: Arc<dyn OrdersService>, order: OrderId) -> Self {
        Self {
            orders,
            order,
            state: Loadable::Loading,
        }
    }

    /// Current page state.
    pub fn state(&self) -> &Loadable<OrderRecord> {
        &self.state
    }

    /// Fetch the order and its items.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationRequired`] when nobody is signed in.
    pub async fn load(
        &mut self,
        session: &Session,
        toasts: &mut Toasts,
    ) -> Result<&Loadable<OrderRecord>, AuthenticationRequired> {
        let user = session.require_user()?;

        self.state = Loadable::Loading;

        self.state = match self.orders.get_order(self.order.clone(), user.clone()).await {
            Ok(order) => Loadable::Ready(order),
            Err(OrdersServiceError::NotFound) => {
                toasts.error("Order not found");
                Loadable::Empty
            }
            Err(source) => {
                warn!(order = %self.order, "failed to load order: {source}");
                toasts.error("Failed to load order details");
                Loadable::Empty
            }
        };

        Ok(&self.state)
    }

    /// "Try again" after a failed load.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationRequired`] when nobody is signed in.
    pub async fn reload(
        &mut self,
        session: &Session,
        toasts: &mut Toasts,
    ) -> Result<&Loadable<OrderRecord>, AuthenticationRequired> {
        self.load(session, toasts).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rust_decimal::dec;
    use storefront::checkout::PaymentMethod;
    use testresult::TestResult;

    use crate::{
        backend::BackendError,
        domain::{
            orders::{MockOrdersService, records::OrderStatus},
            products::MockProductsService,
            restaurants::MockRestaurantsService,
        },
        session::UserId,
    };

    use super::*;

    fn product(id: &str) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: dec!(4.99),
            category: Some("vegetables".to_string()),
            image: None,
            description: None,
            unit: None,
            brand: None,
            kind: None,
            restaurant_id: None,
            created_at: None,
        }
    }

    fn order(id: &str) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(id),
            user_id: UserId::new("u-1"),
            total_amount: dec!(10.98),
            status: OrderStatus::Confirmed,
            delivery_address: "1 Main St".to_string(),
            payment_method: PaymentMethod::Cod,
            notes: None,
            created_at: None,
            items: Vec::new(),
        }
    }

    fn backend_failure() -> BackendError {
        BackendError::UnexpectedResponse("connection reset".to_string())
    }

    fn pages(products: MockProductsService) -> CatalogPages {
        let mut restaurants = MockRestaurantsService::new();

        restaurants.expect_list_restaurants().never();
        restaurants.expect_get_restaurant().never();
        restaurants.expect_list_menu().never();

        CatalogPages::new(Arc::new(products), Arc::new(restaurants))
    }

    #[test]
    fn toasts_drain_oldest_first() {
        let mut toasts = Toasts::default();

        toasts.success("Added to cart");
        toasts.error("Failed to load products");

        let kinds: Vec<ToastKind> = toasts.iter().map(|toast| toast.kind).collect();

        assert_eq!(kinds, [ToastKind::Success, ToastKind::Error]);
        assert_eq!(toasts.drain().len(), 2);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn category_page_filters_by_category() {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .with(eq(Some("vegetables".to_string())))
            .return_once(|_| Ok(vec![product("v1"), product("v2")]));

        let mut toasts = Toasts::default();
        let page = pages(products).category(Some("vegetables"), &mut toasts).await;

        assert_eq!(page.ready().map(Vec::len), Some(2));
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn failed_listing_shows_toast_and_empty_page() {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_| Err(backend_failure().into()));

        let mut toasts = Toasts::default();
        let page = pages(products).category(None, &mut toasts).await;

        assert!(page.is_empty());
        assert_eq!(
            toasts.drain(),
            [Toast {
                kind: ToastKind::Error,
                message: "Failed to load products".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn keyword_failure_does_not_fail_product_page() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .with(eq(ProductId::new("v1")))
            .return_once(|_| Ok(product("v1")));

        products
            .expect_list_keywords()
            .once()
            .return_once(|_| Err(backend_failure().into()));

        let mut toasts = Toasts::default();
        let page = pages(products)
            .product(ProductId::new("v1"), &mut toasts)
            .await;

        let page = page.ready().ok_or("expected a product page")?;

        assert_eq!(page.product.id, ProductId::new("v1"));
        assert!(page.keywords.is_empty());
        assert!(toasts.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_skips_keywords() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        products.expect_list_keywords().never();

        let mut toasts = Toasts::default();
        let page = pages(products)
            .product(ProductId::new("nope"), &mut toasts)
            .await;

        assert!(page.is_empty());
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test]
    async fn restaurant_page_includes_menu() {
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_get_restaurant()
            .once()
            .return_once(|id| {
                Ok(RestaurantRecord {
                    id,
                    name: "Dosa Corner".to_string(),
                    description: None,
                    cuisine: None,
                    image: None,
                    address: None,
                    rating: None,
                    delivery_time: None,
                })
            });

        restaurants
            .expect_list_menu()
            .once()
            .with(eq(RestaurantId::new("r-1")))
            .return_once(|_| Ok(Vec::new()));

        restaurants.expect_list_restaurants().never();

        let mut products = MockProductsService::new();
        products.expect_list_products().never();

        let pages = CatalogPages::new(Arc::new(products), Arc::new(restaurants));
        let mut toasts = Toasts::default();

        let page = pages.restaurant(RestaurantId::new("r-1"), &mut toasts).await;

        assert_eq!(
            page.ready().map(|page| page.restaurant.name.as_str()),
            Some("Dosa Corner")
        );
    }

    #[tokio::test]
    async fn order_confirmation_requires_sign_in() {
        let mut orders = MockOrdersService::new();
        orders.expect_get_order().never();

        let mut page = OrderConfirmationPage::new(Arc::new(orders), OrderId::new("o-1"));
        let mut toasts = Toasts::default();

        let result = page.load(&Session::anonymous(), &mut toasts).await;

        assert_eq!(result.map_err(Navigation::from), Err(Navigation::Login));
    }

    #[tokio::test]
    async fn order_confirmation_can_be_retried() {
        let mut orders = MockOrdersService::new();
        let mut calls = 0;

        orders
            .expect_get_order()
            .times(2)
            .withf(|order, user| order.as_str() == "o-1" && user.as_str() == "u-1")
            .returning(move |order, _| {
                calls += 1;

                if calls == 1 {
                    Err(backend_failure().into())
                } else {
                    Ok(self::order(order.as_str()))
                }
            });

        let session = Session::authenticated(UserId::new("u-1"));
        let mut page = OrderConfirmationPage::new(Arc::new(orders), OrderId::new("o-1"));
        let mut toasts = Toasts::default();

        assert_eq!(page.load(&session, &mut toasts).await, Ok(&Loadable::Empty));
        assert_eq!(toasts.len(), 1);

        let state = page.reload(&session, &mut toasts).await;

        assert_eq!(
            state.map(|state| state.ready().map(|order| order.total_amount)),
            Ok(Some(dec!(10.98)))
        );
    }
}
