use serde_json::json;
use tracing::info;

use crate::client::{ApiClient, HttpMethod};
use crate::error::{ClientError, ClientResult};
use crate::models::responses::non_empty_or;
use crate::models::{
    ActionResponse, FarmerProfile, FarmerRegistration, NewProduct, Product, ProductListResponse,
    ProductUpdate,
};

/// Farmer account and listing management. Everything except `register`
/// needs a signed-in farmer session.
#[derive(Clone)]
pub struct FarmerService {
    api: ApiClient,
}

impl FarmerService {
    pub fn new(api: ApiClient) -> Self {
        FarmerService { api }
    }

    pub async fn register(&self, registration: &FarmerRegistration) -> ClientResult<String> {
        let response: ActionResponse = self
            .api
            .send_json("/farmer/register", HttpMethod::Post, registration)
            .await?;
        let message = response.into_result("Registration failed.")?;

        info!("Registered farmer {}", registration.email);
        Ok(message)
    }

    pub async fn dashboard(&self) -> ClientResult<FarmerProfile> {
        self.api.get("/farmer/dashboard").await
    }

    /// The signed-in farmer's own listings, active or not.
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let response: ProductListResponse = self
            .api
            .send_empty("/farmer/product/list-products", HttpMethod::Post)
            .await?;

        if response.success == Some(false) {
            return Err(ClientError::Application(non_empty_or(
                response.message,
                "Failed to fetch products.",
            )));
        }

        info!("Fetched {} farmer products", response.products.len());
        Ok(response.products)
    }

    pub async fn find_product(&self, id: i64) -> ClientResult<Product> {
        self.list_products()
            .await?
            .into_iter()
            .find(|product| product.id == id)
            .ok_or_else(|| ClientError::Application("Product not found.".to_string()))
    }

    pub async fn add_product(&self, product: &NewProduct) -> ClientResult<String> {
        let response: ActionResponse = self
            .api
            .send_json("/farmer/product/add-product", HttpMethod::Post, product)
            .await?;
        let message = response.into_result("Failed to add product.")?;

        info!("Added product {}", product.name);
        Ok(message)
    }

    pub async fn edit_product(&self, update: &ProductUpdate) -> ClientResult<String> {
        let response: ActionResponse = self
            .api
            .send_json("/farmer/product/edit-product", HttpMethod::Post, update)
            .await?;
        let message = response.into_result("Failed to update product.")?;

        info!("Updated product {}", update.id);
        Ok(message)
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<String> {
        let response: ActionResponse = self
            .api
            .send_json("/farmer/product/delete-product", HttpMethod::Delete, &json!({ "id": id }))
            .await?;
        let message = response.into_result("Failed to delete product.")?;

        info!("Deleted product {}", id);
        Ok(message)
    }
}
