use storefront_catalog::{Catalog, ProductId};
use storefront_core::RequestId;

use crate::item::CartItem;
use crate::mutation::{MutationError, MutationRequest, MutationState, PendingMutations};
use crate::reconcile::reconcile;
use crate::reference::CartReference;
use crate::total::{CheckoutSummary, total_value};

/// The cart as the user sees it.
///
/// The displayed items are always `reconcile(references, catalog)` for the
/// most recently applied authoritative reference list. Nothing here patches
/// items locally: a successful mutation replaces the references wholesale, a
/// failed one leaves them exactly as they were.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    catalog: Catalog,
    references: Vec<CartReference>,
    items: Vec<CartItem>,
    pending: PendingMutations,
}

impl CartView {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn with_references(catalog: Catalog, references: Vec<CartReference>) -> Self {
        let items = reconcile(&references, catalog.products());
        Self {
            catalog,
            references,
            items,
            pending: PendingMutations::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn references(&self) -> &[CartReference] {
        &self.references
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap in a freshly fetched catalog and re-derive the items.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.items = reconcile(&self.references, self.catalog.products());
    }

    /// Replace the reference list with an authoritative one (initial fetch or
    /// a mutation response).
    pub fn replace_references(&mut self, references: Vec<CartReference>) {
        self.items = reconcile(&references, self.catalog.products());
        self.references = references;
    }

    /// Mark a validated request as in flight.
    pub fn begin(&mut self, request: &MutationRequest) {
        self.pending.begin(&request.product_id, request.request_id);
    }

    /// The backend accepted a request and returned the full cart.
    ///
    /// Whatever response is applied last wins, regardless of the order the
    /// requests were issued in.
    pub fn apply_success(
        &mut self,
        request_id: RequestId,
        product_id: &ProductId,
        references: Vec<CartReference>,
    ) {
        self.pending.finish(product_id, request_id);
        self.replace_references(references);
        tracing::debug!(
            %request_id,
            %product_id,
            lines = self.items.len(),
            "cart replaced from response"
        );
    }

    /// The backend rejected a request or could not be reached. The displayed
    /// cart is kept as it was.
    pub fn apply_failure(
        &mut self,
        request_id: RequestId,
        product_id: &ProductId,
        error: &MutationError,
    ) {
        self.pending.finish(product_id, request_id);
        tracing::warn!(%request_id, %product_id, %error, "cart mutation failed");
    }

    pub fn state_of(&self, product_id: &ProductId) -> MutationState {
        self.pending.state(product_id)
    }

    pub fn total(&self) -> f64 {
        total_value(&self.items)
    }

    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary::from_items(&self.items)
    }
}
