use serde::Serialize;

use storefront_catalog::{Product, ProductId};
use storefront_core::{Entity, ValueObject};

/// A display-ready cart line: the matched product plus the referenced quantity.
///
/// Built by [`crate::reconcile`] and thrown away on the next reconciliation.
/// Serializes flat, the way the storefront renders it (product fields + `qty`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    #[serde(flatten)]
    product: Product,
    #[serde(rename = "qty")]
    quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        self.product.id()
    }

    pub fn name(&self) -> &str {
        self.product.name()
    }

    pub fn cost(&self) -> f64 {
        self.product.cost()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `cost * quantity` for this line.
    pub fn line_total(&self) -> f64 {
        self.product.cost() * f64::from(self.quantity)
    }

    /// Target quantity for the "+" button.
    pub fn incremented(&self) -> i64 {
        i64::from(self.quantity) + 1
    }

    /// Target quantity for the "-" button; reaching 0 removes the line.
    pub fn decremented(&self) -> i64 {
        i64::from(self.quantity) - 1
    }
}

impl ValueObject for CartItem {}
