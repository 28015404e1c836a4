use tracing::error;

use super::LoadState;
use crate::error::{ClientError, ClientResult};
use crate::models::{CartItem, cart_total};
use crate::notice::Notice;
use crate::services::CartService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The server accepted the new quantity.
    Updated(u32),
    /// Nothing was sent (decrement at quantity 1).
    Unchanged,
}

/// State behind the buyer's cart screen.
pub struct CartViewModel {
    service: CartService,
    state: LoadState,
    items: Vec<CartItem>,
    notice: Option<Notice>,
    checked_out: bool,
}

impl CartViewModel {
    pub fn new(service: CartService) -> Self {
        CartViewModel {
            service,
            state: LoadState::Idle,
            items: Vec::new(),
            notice: None,
            checked_out: false,
        }
    }

    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.service.fetch().await {
            Ok(items) => {
                self.items = items;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                error!("Error fetching cart: {}", e);
                self.state = LoadState::Failed;
                self.notice = Some(Notice::from_error(&e));
            }
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        cart_total(&self.items)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_checked_out(&self) -> bool {
        self.checked_out
    }

    /// Whether this product's controls should be disabled.
    pub fn is_busy(&self, product_id: i64) -> bool {
        self.service.in_flight().is_busy(product_id)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn quantity_of(&self, product_id: i64) -> ClientResult<u32> {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map(|item| item.quantity)
            .ok_or_else(|| ClientError::Validation(format!("Product {} is not in the cart.", product_id)))
    }

    pub async fn increment(&mut self, product_id: i64) -> ClientResult<QuantityChange> {
        let quantity = self
            .quantity_of(product_id)?
            .checked_add(1)
            .ok_or_else(|| ClientError::Validation("Quantity cannot be increased further.".to_string()))?;
        self.set_quantity(product_id, quantity).await
    }

    pub async fn decrement(&mut self, product_id: i64) -> ClientResult<QuantityChange> {
        let quantity = self.quantity_of(product_id)?;
        if quantity <= 1 {
            return Ok(QuantityChange::Unchanged);
        }
        self.set_quantity(product_id, quantity - 1).await
    }

    async fn set_quantity(&mut self, product_id: i64, quantity: u32) -> ClientResult<QuantityChange> {
        let result = self.service.update_quantity(product_id, quantity).await;
        self.record(result)?;

        if let Some(item) = self.items.iter_mut().find(|item| item.product.id == product_id) {
            item.quantity = quantity;
        }
        Ok(QuantityChange::Updated(quantity))
    }

    pub async fn remove(&mut self, product_id: i64) -> ClientResult<()> {
        let result = self.service.remove(product_id).await;
        self.record(result)?;

        self.items.retain(|item| item.product.id != product_id);
        Ok(())
    }

    pub async fn checkout(&mut self) -> ClientResult<()> {
        if self.items.is_empty() {
            return Err(ClientError::Validation("Your cart is empty.".to_string()));
        }

        let result = self.service.checkout().await;
        self.record(result)?;

        self.items.clear();
        self.checked_out = true;
        Ok(())
    }

    /// Turns a call outcome into the single notification for it.
    fn record(&mut self, result: ClientResult<String>) -> ClientResult<String> {
        self.notice = Some(match &result {
            Ok(message) if !message.is_empty() => Notice::success(message.clone()),
            Ok(_) => Notice::success("Done."),
            Err(e) => Notice::from_error(e),
        });
        result
    }
}
