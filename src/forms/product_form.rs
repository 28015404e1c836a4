use crate::error::{ClientError, ClientResult};
use crate::models::{NewProduct, Product, ProductUpdate};

const REQUIRED_FIELDS: &str = "Please fill in all required fields.";
const INVALID_NUMBERS: &str =
    "Please enter valid numerical values for Category ID, Price, and Quantity.";

/// Raw text entered on the add/edit product screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub category_id: String,
    pub price: String,
    pub quantity: String,
    pub description: String,
    /// Comma-separated image URLs.
    pub images: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProduct {
    pub name: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: u32,
    pub description: String,
    pub images: Vec<String>,
}

impl ProductForm {
    /// Prefills the edit form from an existing listing.
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            category_id: product.category_id.to_string(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            description: product.description.clone(),
            images: product.images.join(", "),
        }
    }

    pub fn validate(&self) -> ClientResult<ValidatedProduct> {
        let required = [&self.name, &self.category_id, &self.price, &self.quantity];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ClientError::Validation(REQUIRED_FIELDS.to_string()));
        }

        let invalid = || ClientError::Validation(INVALID_NUMBERS.to_string());
        let category_id = self.category_id.trim().parse::<i64>().map_err(|_| invalid())?;
        let quantity = self.quantity.trim().parse::<u32>().map_err(|_| invalid())?;
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
            .ok_or_else(invalid)?;

        Ok(ValidatedProduct {
            name: self.name.trim().to_string(),
            category_id,
            price,
            quantity,
            description: self.description.clone(),
            images: parse_image_list(&self.images),
        })
    }
}

impl ValidatedProduct {
    /// `uploaded` are hosted URLs returned by the media host; they follow any
    /// URLs typed into the form.
    pub fn into_new_product(self, uploaded: Vec<String>) -> NewProduct {
        let mut images = self.images;
        images.extend(uploaded);

        NewProduct {
            name: self.name,
            category_id: self.category_id,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            images,
        }
    }

    pub fn into_update(self, id: i64, is_active: bool) -> ProductUpdate {
        ProductUpdate {
            id,
            name: self.name,
            category_id: self.category_id,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            is_active,
            images: self.images,
        }
    }
}

/// Splits a comma-separated URL list, trimming entries and dropping blanks.
pub fn parse_image_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
