use serde::{Deserialize, Serialize};

use storefront_catalog::ProductId;
use storefront_core::ValueObject;

/// Minimal persisted record of what the user put in the cart.
///
/// Serialized with the backend's field names (`productId`, `qty`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartReference {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartReference {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Same product, different quantity.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        self.with(|r| r.quantity = quantity)
    }
}

impl ValueObject for CartReference {}
