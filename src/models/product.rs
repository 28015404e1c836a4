use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::category_name;

/// Product record as served by the marketplace backend.
///
/// Only `id`, `name` and `price` are required; cart and listing endpoints
/// return trimmed-down product objects, so everything else falls back to a
/// default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub farmer_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(deserialize_with = "decimal_from_number_or_string")]
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_location: Option<String>,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub images: Vec<String>,
    // Older listing payloads carry a single image field instead of `images`.
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Product {
    pub fn category_name(&self) -> &'static str {
        category_name(self.category_id)
    }

    /// First non-blank image reference, trimmed. `None` means "no image".
    pub fn display_image(&self) -> Option<&str> {
        self.images
            .iter()
            .map(|image| image.trim())
            .find(|image| !image.is_empty())
            .or_else(|| {
                self.image_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|image| !image.is_empty())
            })
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

/// Payload for `POST /farmer/product/add-product`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: u32,
    pub description: String,
    pub images: Vec<String>,
}

/// Payload for `POST /farmer/product/edit-product`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUpdate {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: u32,
    pub description: String,
    pub is_active: bool,
    pub images: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Decimal columns come back from the backend either as JSON numbers or as
/// strings (e.g. `"2.50"`).
fn decimal_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => value,
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{}': {}", text, e)))?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "price must be a finite non-negative number, got {}",
            value
        )));
    }
    Ok(value)
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn vec_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
