use tracing::{error, info};

use super::LoadState;
use crate::catalog::{CategoryFilter, ListingQuery, SortMode};
use crate::error::ClientResult;
use crate::models::Product;
use crate::notice::Notice;
use crate::services::{BuyerService, CartService};

/// State behind the buyer's product browsing screen.
///
/// `products` is the canonical list from the server; `visible` is derived
/// from it and the current [`ListingQuery`] and is rebuilt by every setter.
#[derive(Debug, Default)]
pub struct ProductListViewModel {
    state: LoadState,
    products: Vec<Product>,
    visible: Vec<Product>,
    query: ListingQuery,
    notice: Option<Notice>,
}

impl ProductListViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: ListingQuery) -> Self {
        ProductListViewModel {
            query,
            ..Self::default()
        }
    }

    pub async fn load(&mut self, buyer: &BuyerService) {
        self.begin_load();
        let result = buyer.home().await;
        self.finish_load(result);
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn finish_load(&mut self, result: ClientResult<Vec<Product>>) {
        match result {
            Ok(products) => {
                info!("Loaded {} products", products.len());
                self.state = LoadState::Loaded;
                self.set_products(products);
            }
            Err(e) => {
                error!("Error fetching products: {}", e);
                self.state = LoadState::Failed;
                self.products.clear();
                self.visible.clear();
                self.notice = Some(Notice::error(format!(
                    "Unable to fetch products. {}",
                    e.user_message()
                )));
            }
        }
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.recompute();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
        self.recompute();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.query.sort = sort;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = self.query.apply(&self.products);
    }

    /// Adds to the buyer's cart. The product lists are left untouched; stock
    /// is only ever reported by the server.
    pub async fn add_to_cart(&mut self, cart: &CartService, product_id: i64, quantity: u32) -> ClientResult<String> {
        let result = cart.add(product_id, quantity).await;
        self.notice = Some(match &result {
            Ok(message) if !message.is_empty() => Notice::success(message.clone()),
            Ok(_) => Notice::success("Added to cart."),
            Err(e) => Notice::from_error(e),
        });
        result
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismisses and returns the pending notification.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::client::{ApiClient, Session};
    use crate::error::ClientError;
    use serde_json::json;
    use std::sync::Arc;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(json!([
            { "id": 1, "name": "Tomato", "category_id": 1, "price": 2.50, "quantity": 4, "created_at": "2024-10-01T00:00:00Z" },
            { "id": 2, "name": "Apple", "category_id": 2, "price": 1.00, "quantity": 6, "created_at": "2024-10-02T00:00:00Z" },
            { "id": 3, "name": "Pumpkin Seeds", "category_id": 3, "price": 3.00, "quantity": 1, "created_at": "2024-09-20T00:00:00Z" },
        ]))
        .unwrap()
    }

    fn names(view: &ProductListViewModel) -> Vec<&str> {
        view.visible().iter().map(|p| p.name.as_str()).collect()
    }

    fn api(mock: &Arc<MockTransport>) -> ApiClient {
        ApiClient::new("https://market.example.com", mock.clone(), Session::new())
    }

    #[test]
    fn test_loaded_list_uses_current_query() {
        let mut view = ProductListViewModel::new();
        view.begin_load();
        assert!(view.is_loading());

        view.finish_load(Ok(catalog()));
        assert_eq!(view.state(), LoadState::Loaded);
        assert_eq!(names(&view), vec!["Apple", "Tomato", "Pumpkin Seeds"]);
    }

    #[test]
    fn test_every_setter_recomputes() {
        let mut view = ProductListViewModel::new();
        view.set_products(catalog());

        view.set_sort(SortMode::PriceAsc);
        assert_eq!(names(&view), vec!["Apple", "Tomato", "Pumpkin Seeds"]);

        view.set_category(CategoryFilter::Seeds);
        assert_eq!(names(&view), vec!["Pumpkin Seeds"]);

        view.set_category(CategoryFilter::All);
        view.set_search("TOM");
        assert_eq!(names(&view), vec!["Tomato"]);

        view.set_search("");
        view.set_sort(SortMode::DateAsc);
        assert_eq!(names(&view), vec!["Pumpkin Seeds", "Tomato", "Apple"]);
        assert_eq!(view.products().len(), 3);
    }

    #[test]
    fn test_failed_load_leaves_list_empty_with_one_notice() {
        let mut view = ProductListViewModel::new();
        view.set_products(catalog());

        view.finish_load(Err(ClientError::Network("timed out".to_string())));
        assert_eq!(view.state(), LoadState::Failed);
        assert!(view.products().is_empty());
        assert!(view.visible().is_empty());

        let notice = view.take_notice().unwrap();
        assert!(notice.is_error());
        assert!(view.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_load_through_service() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!([{ "id": 1, "name": "Tomato", "category_id": 1, "price": 2.5 }]));

        let mut view = ProductListViewModel::with_query(ListingQuery::new(CategoryFilter::Vegetables, "", SortMode::PriceAsc));
        view.load(&BuyerService::new(api(&mock))).await;

        assert_eq!(names(&view), vec!["Tomato"]);
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_add_to_cart_does_not_touch_lists() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({ "success": true, "message": "Product added to cart" }));
        mock.push_json(400, json!({ "message": "Insufficient stock" }));
        let cart = CartService::new(api(&mock));

        let mut view = ProductListViewModel::new();
        view.set_products(catalog());
        let before = view.visible().to_vec();

        view.add_to_cart(&cart, 1, 2).await.unwrap();
        assert_eq!(view.take_notice(), Some(Notice::success("Product added to cart")));

        assert!(view.add_to_cart(&cart, 3, 5).await.is_err());
        assert_eq!(view.take_notice(), Some(Notice::error("Insufficient stock")));

        assert_eq!(view.visible(), before.as_slice());
        assert_eq!(view.products()[0].quantity, 4);
    }
}
