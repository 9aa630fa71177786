//! Storefront controller: loads the catalog and cart, runs quantity mutations.

use std::sync::Arc;

use storefront_auth::{Session, SessionStore};
use storefront_cart::{
    CartItem, CartView, CheckoutSummary, MutationError, MutationKind, MutationRequest, validate,
};
use storefront_catalog::{CatalogQuery, ProductId};

use crate::error::RemoteError;
use crate::source::{CartStore, CatalogSource};

/// Owns the displayed cart and the collaborators that feed it.
///
/// The session is read on every mutation; logging out elsewhere takes effect on
/// the next request.
pub struct Storefront {
    catalog_source: Arc<dyn CatalogSource>,
    cart_store: Arc<dyn CartStore>,
    session: Arc<dyn SessionStore>,
    view: CartView,
}

impl Storefront {
    pub fn new(
        catalog_source: Arc<dyn CatalogSource>,
        cart_store: Arc<dyn CartStore>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            catalog_source,
            cart_store,
            session,
            view: CartView::default(),
        }
    }

    pub fn view(&self) -> &CartView {
        &self.view
    }

    pub fn items(&self) -> &[CartItem] {
        self.view.items()
    }

    pub fn session(&self) -> Session {
        self.session.current()
    }

    /// Fetch the catalog, then the signed-in user's cart.
    ///
    /// A catalog failure aborts the load: without products nothing can be
    /// reconciled.
    pub async fn load(&mut self, query: Option<&CatalogQuery>) -> Result<(), RemoteError> {
        let catalog = self.catalog_source.fetch_catalog(query).await?;
        tracing::info!(products = catalog.len(), "catalog loaded");
        self.view.replace_catalog(catalog);
        self.refresh_cart().await
    }

    /// Replace the displayed cart with the backend's current one.
    pub async fn refresh_cart(&mut self) -> Result<(), RemoteError> {
        let session = self.session.current();
        let references = self.cart_store.fetch_cart(session.token()).await?;
        self.view.replace_references(references);
        tracing::info!(
            lines = self.view.items().len(),
            signed_in = session.is_signed_in(),
            "cart loaded"
        );
        Ok(())
    }

    /// Run one quantity mutation: validate locally, send, and rebuild the cart
    /// from the backend's response.
    ///
    /// On any error the displayed cart is left as it was.
    pub async fn handle_quantity(&mut self, request: MutationRequest) -> Result<&[CartItem], MutationError> {
        let session = self.session.current();
        let update = match validate(session.token(), self.view.items(), self.view.catalog(), &request) {
            Ok(update) => update,
            Err(error) => {
                tracing::info!(
                    product_id = %request.product_id,
                    quantity = request.quantity,
                    %error,
                    "cart mutation rejected"
                );
                return Err(error);
            }
        };

        self.view.begin(&request);
        tracing::debug!(
            request_id = %request.request_id,
            product_id = %update.product_id,
            quantity = update.quantity,
            removal = update.is_removal(),
            "cart mutation sent"
        );

        match self
            .cart_store
            .update_cart(&update.token, &update.product_id, update.quantity)
            .await
        {
            Ok(references) => {
                self.view
                    .apply_success(request.request_id, &request.product_id, references);
                Ok(self.view.items())
            }
            Err(remote) => {
                let error = MutationError::from(remote);
                self.view
                    .apply_failure(request.request_id, &request.product_id, &error);
                Err(error)
            }
        }
    }

    /// First add from a product card.
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        prevent_duplicate: bool,
    ) -> Result<&[CartItem], MutationError> {
        self.handle_quantity(MutationRequest::add_to_cart(product_id, prevent_duplicate))
            .await
    }

    pub async fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<&[CartItem], MutationError> {
        self.handle_quantity(MutationRequest::set(product_id, quantity)).await
    }

    /// "+" on a cart line. A product not yet in the cart goes to 1.
    pub async fn increment(&mut self, product_id: &ProductId) -> Result<&[CartItem], MutationError> {
        let request = match self.view.item(product_id) {
            Some(item) => MutationRequest::increment(item),
            None => MutationRequest {
                kind: MutationKind::Increment,
                ..MutationRequest::set(product_id.clone(), 1)
            },
        };
        self.handle_quantity(request).await
    }

    /// "-" on a cart line. Reaching 0 removes the line.
    pub async fn decrement(&mut self, product_id: &ProductId) -> Result<&[CartItem], MutationError> {
        let request = match self.view.item(product_id) {
            Some(item) => MutationRequest::decrement(item),
            None => MutationRequest {
                kind: MutationKind::Decrement,
                ..MutationRequest::set(product_id.clone(), -1)
            },
        };
        self.handle_quantity(request).await
    }

    pub fn total(&self) -> f64 {
        self.view.total()
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.view.summary()
    }

    /// Whether the signed-in wallet covers the cart. `None` when no balance is
    /// known.
    pub fn balance_covers_cart(&self) -> Option<bool> {
        let summary = self.view.summary();
        self.session
            .current()
            .balance()
            .map(|balance| summary.covered_by(balance))
    }

    /// Wallet balance left after paying for the cart; negative when it falls
    /// short. `None` when no balance is known.
    pub fn balance_after_checkout(&self) -> Option<f64> {
        let summary = self.view.summary();
        self.session
            .current()
            .balance()
            .map(|balance| summary.balance_after(balance))
    }
}
