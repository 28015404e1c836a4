use tracing::info;

use crate::client::{ApiClient, HttpMethod};
use crate::error::{ClientError, ClientResult};
use crate::models::{BuyerRegistration, Product, RegisteredBuyer};

/// Public catalog and buyer account endpoints.
#[derive(Clone)]
pub struct BuyerService {
    api: ApiClient,
}

impl BuyerService {
    pub fn new(api: ApiClient) -> Self {
        BuyerService { api }
    }

    /// Every active product, from `GET /buyer/home`.
    pub async fn home(&self) -> ClientResult<Vec<Product>> {
        let products: Vec<Product> = self.api.get("/buyer/home").await?;
        info!("Fetched {} products from buyer home", products.len());
        Ok(products)
    }

    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        self.api.get(&format!("/buyer/product/{}", id)).await
    }

    /// The backend answers with the created buyer record; anything without an
    /// id and email is treated as a failed registration.
    pub async fn register(&self, registration: &BuyerRegistration) -> ClientResult<RegisteredBuyer> {
        let created: RegisteredBuyer = self
            .api
            .send_json("/buyer/register", HttpMethod::Post, registration)
            .await?;

        match (&created.id, &created.email) {
            (Some(id), Some(email)) => {
                info!("Registered buyer {} ({})", id, email);
                Ok(created)
            }
            _ => Err(ClientError::Application(
                "Registration failed. Please try again.".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Session;
    use crate::client::mock::MockTransport;
    use crate::models::DeliveryPreferences;
    use serde_json::json;
    use std::sync::Arc;

    fn service(mock: &Arc<MockTransport>) -> BuyerService {
        BuyerService::new(ApiClient::new("https://market.example.com", mock.clone(), Session::new()))
    }

    fn registration() -> BuyerRegistration {
        BuyerRegistration {
            email: "b@example.com".to_string(),
            password: "pw".to_string(),
            first_name: "B".to_string(),
            last_name: "Y".to_string(),
            delivery_preferences: DeliveryPreferences {
                contactless: false,
                preferred_time: "evening".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_home_decodes_products() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(
            200,
            json!([
                { "id": 1, "name": "Tomato", "category_id": 1, "price": "2.50", "quantity": 5, "images": [] },
                { "id": 2, "name": "Apple", "category_id": 2, "price": 1, "quantity": 9, "images": ["a.jpg"] },
            ]),
        );

        let products = service(&mock).home().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, 2.5);

        let request = &mock.requests()[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://market.example.com/buyer/home");
    }

    #[tokio::test]
    async fn test_product_detail_path() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({ "id": 17, "name": "Kale", "price": 3, "farm_location": "Ojai" }));

        let product = service(&mock).product(17).await.unwrap();
        assert_eq!(product.farm_location.as_deref(), Some("Ojai"));
        assert_eq!(mock.requests()[0].url, "https://market.example.com/buyer/product/17");
    }

    #[tokio::test]
    async fn test_register_requires_id_and_email() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(201, json!({ "id": 5, "email": "b@example.com" }));
        mock.push_json(200, json!({ "message": "ok" }));

        let created = service(&mock).register(&registration()).await.unwrap();
        assert_eq!(created.id, Some(5));

        let err = service(&mock).register(&registration()).await.unwrap_err();
        assert_eq!(err.user_message(), "Registration failed. Please try again.");
    }

    #[tokio::test]
    #[ignore = "talks to the live backend; run with FARM_MARKET_LIVE=1"]
    async fn test_live_home_listing() {
        if std::env::var("FARM_MARKET_LIVE").is_err() {
            return;
        }

        let config = crate::config::ClientConfig::load(None).unwrap();
        let api = ApiClient::from_config(&config, Session::new()).unwrap();
        let products = BuyerService::new(api).home().await.unwrap();

        println!("Live catalog has {} products", products.len());
        assert!(products.iter().all(|p| p.id > 0));
    }
}
