use serde::{Deserialize, Serialize};

use super::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.product.price * self.quantity as f64
    }

    /// Quantity never drops below one; removal is a separate action.
    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

/// Body of `POST /cart/add` and `POST /cart/update`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartLine {
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub quantity: u32,
}

pub fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}
