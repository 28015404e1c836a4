use tracing::info;

use super::in_flight::InFlightSet;
use crate::client::{ApiClient, HttpMethod};
use crate::error::{ClientError, ClientResult};
use crate::models::responses::non_empty_or;
use crate::models::{ActionResponse, CartItem, CartLine, CartResponse};

/// Server-side cart of the signed-in buyer.
///
/// Quantity changes and removals hold the product's entry in the shared
/// [`InFlightSet`] for the length of the call. A second change for the same
/// product while one is pending fails with [`ClientError::Busy`] without
/// touching the network.
#[derive(Clone)]
pub struct CartService {
    api: ApiClient,
    in_flight: InFlightSet,
}

impl CartService {
    pub fn new(api: ApiClient) -> Self {
        CartService {
            api,
            in_flight: InFlightSet::new(),
        }
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    pub async fn fetch(&self) -> ClientResult<Vec<CartItem>> {
        let response: CartResponse = self.api.get("/cart").await?;

        if response.success != Some(true) {
            return Err(ClientError::Application(non_empty_or(
                response.message,
                "Unable to fetch cart. Please try again later.",
            )));
        }

        info!("Fetched cart with {} items", response.cart.len());
        Ok(response.cart)
    }

    pub async fn add(&self, product_id: i64, quantity: u32) -> ClientResult<String> {
        if quantity == 0 {
            return Err(ClientError::Validation("Quantity must be at least 1.".to_string()));
        }

        let line = CartLine {
            product_id,
            quantity,
        };
        let response: ActionResponse = self.api.send_json("/cart/add", HttpMethod::Post, &line).await?;
        let message = response.into_result("Unable to add item to cart.")?;

        info!("Added {} x product {} to cart", quantity, product_id);
        Ok(message)
    }

    pub async fn update_quantity(&self, product_id: i64, quantity: u32) -> ClientResult<String> {
        if quantity == 0 {
            return Err(ClientError::Validation("Quantity must be at least 1.".to_string()));
        }

        let _guard = self
            .in_flight
            .try_acquire(product_id)
            .ok_or(ClientError::Busy(product_id))?;

        let line = CartLine {
            product_id,
            quantity,
        };
        let response: ActionResponse = self
            .api
            .send_json("/cart/update", HttpMethod::Post, &line)
            .await?;

        response.into_result("Unable to update quantity. Please try again later.")
    }

    pub async fn remove(&self, product_id: i64) -> ClientResult<String> {
        let _guard = self
            .in_flight
            .try_acquire(product_id)
            .ok_or(ClientError::Busy(product_id))?;

        let response: ActionResponse = self
            .api
            .send_empty(&format!("/cart/remove/{}", product_id), HttpMethod::Delete)
            .await?;

        response.into_result("Unable to remove item. Please try again later.")
    }

    pub async fn checkout(&self) -> ClientResult<String> {
        let response: ActionResponse = self.api.send_empty("/checkout", HttpMethod::Post).await?;
        let message = response.into_result("Unable to complete checkout. Please try again later.")?;

        info!("Checkout completed");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::client::{RequestBody, Session};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn service(mock: &Arc<MockTransport>) -> CartService {
        CartService::new(ApiClient::new("https://market.example.com", mock.clone(), Session::new()))
    }

    fn json_body(body: &RequestBody) -> Value {
        match body {
            RequestBody::Json(text) => serde_json::from_str(text).unwrap(),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_requires_success_flag() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(
            200,
            json!({ "success": true, "cart": [ { "product": { "id": 1, "name": "Kale", "price": 2 }, "quantity": 3 } ] }),
        );
        mock.push_json(200, json!({ "success": false }));
        let cart = service(&mock);

        let items = cart.fetch().await.unwrap();
        assert_eq!(items[0].quantity, 3);

        let err = cart.fetch().await.unwrap_err();
        assert_eq!(err.user_message(), "Unable to fetch cart. Please try again later.");
    }

    #[tokio::test]
    async fn test_add_sends_product_line() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({ "success": true, "message": "Added to cart" }));

        let message = service(&mock).add(4, 2).await.unwrap();
        assert_eq!(message, "Added to cart");

        let request = &mock.requests()[0];
        assert_eq!(request.url, "https://market.example.com/cart/add");
        assert_eq!(json_body(&request.body), json!({ "productId": 4, "quantity": 2 }));
    }

    #[tokio::test]
    async fn test_update_rejected_while_busy() {
        let mock = Arc::new(MockTransport::new());
        let cart = service(&mock);

        let held = cart.in_flight().try_acquire(5).unwrap();
        let err = cart.update_quantity(5, 2).await.unwrap_err();
        assert_eq!(err, ClientError::Busy(5));
        assert_eq!(mock.request_count(), 0);

        drop(held);
        mock.push_json(200, json!({ "success": true, "message": "Cart updated" }));
        assert_eq!(cart.update_quantity(5, 2).await.unwrap(), "Cart updated");
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(500, json!({ "message": "Database unavailable" }));
        let cart = service(&mock);

        let err = cart.remove(9).await.unwrap_err();
        assert_eq!(err.user_message(), "Database unavailable");
        assert!(!cart.in_flight().is_busy(9));

        let request = &mock.requests()[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "https://market.example.com/cart/remove/9");
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let cart = service(&mock);

        assert!(matches!(cart.update_quantity(1, 0).await, Err(ClientError::Validation(_))));
        assert!(matches!(cart.add(1, 0).await, Err(ClientError::Validation(_))));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_failure_message() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({ "success": false, "message": "Cart is empty" }));

        let err = service(&mock).checkout().await.unwrap_err();
        assert_eq!(err, ClientError::Application("Cart is empty".to_string()));
    }
}
