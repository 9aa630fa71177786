use std::collections::HashMap;

use storefront_catalog::{Product, ProductId};
use storefront_core::Entity;

use crate::item::CartItem;
use crate::reference::CartReference;

/// Join the cart's reference list against the catalog.
///
/// - One item per (reference, matching product) pair, in reference order.
/// - References with no matching product are dropped silently; a stale catalog
///   still renders the rest of the cart.
/// - Duplicate references are kept as separate items.
///
/// Neither input is modified.
pub fn reconcile(references: &[CartReference], catalog: &[Product]) -> Vec<CartItem> {
    if references.is_empty() {
        return Vec::new();
    }

    // Group rather than index: a catalog that breaks id uniqueness still yields
    // every match, in catalog order.
    let mut by_id: HashMap<&ProductId, Vec<&Product>> = HashMap::with_capacity(catalog.len());
    for product in catalog {
        by_id.entry(product.id()).or_default().push(product);
    }

    let mut items = Vec::with_capacity(references.len());
    for reference in references {
        match by_id.get(&reference.product_id) {
            Some(matches) => items.extend(
                matches
                    .iter()
                    .map(|&product| CartItem::new(product.clone(), reference.quantity)),
            ),
            None => {
                tracing::debug!(
                    product_id = %reference.product_id,
                    quantity = reference.quantity,
                    "cart reference has no catalog entry; dropped"
                );
            }
        }
    }
    items
}
