//! In-process backend: a fixed catalog and one cart per registered token.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use storefront_auth::AuthToken;
use storefront_cart::CartReference;
use storefront_catalog::{Catalog, CatalogQuery, ProductId};

use crate::error::RemoteError;
use crate::source::{CartStore, CatalogSource};

/// Behaves like the real backend: unknown tokens are unauthorized, unknown
/// products are rejected, quantity 0 deletes the product from the cart.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    catalog: Catalog,
    carts: Mutex<HashMap<AuthToken, Vec<CartReference>>>,
    offline: AtomicBool,
}

impl InMemoryBackend {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Register a user (by token) with an initial cart.
    pub fn with_user(self, token: AuthToken, references: Vec<CartReference>) -> Self {
        self.lock_carts().insert(token, references);
        self
    }

    /// While offline every call fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Server-side view of a user's cart.
    pub fn cart_of(&self, token: &AuthToken) -> Option<Vec<CartReference>> {
        self.lock_carts().get(token).cloned()
    }

    fn lock_carts(&self) -> std::sync::MutexGuard<'_, HashMap<AuthToken, Vec<CartReference>>> {
        match self.carts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn ensure_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("backend unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for InMemoryBackend {
    async fn fetch_catalog(&self, query: Option<&CatalogQuery>) -> Result<Catalog, RemoteError> {
        self.ensure_online()?;
        match query {
            Some(q) => {
                let products = self.catalog.search(q).into_iter().cloned().collect();
                Catalog::new(products).map_err(|e| RemoteError::Parse(e.to_string()))
            }
            None => Ok(self.catalog.clone()),
        }
    }
}

#[async_trait]
impl CartStore for InMemoryBackend {
    async fn fetch_cart(&self, token: Option<&AuthToken>) -> Result<Vec<CartReference>, RemoteError> {
        self.ensure_online()?;
        let Some(token) = token else {
            return Ok(Vec::new());
        };
        self.lock_carts()
            .get(token)
            .cloned()
            .ok_or(RemoteError::Unauthorized)
    }

    async fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartReference>, RemoteError> {
        self.ensure_online()?;
        let mut carts = self.lock_carts();
        let cart = carts.get_mut(token).ok_or(RemoteError::Unauthorized)?;
        if !self.catalog.contains(product_id) {
            return Err(RemoteError::UnknownProduct(product_id.clone()));
        }

        if quantity == 0 {
            cart.retain(|r| &r.product_id != product_id);
        } else if let Some(existing) = cart.iter_mut().find(|r| &r.product_id == product_id) {
            *existing = existing.with_quantity(quantity);
        } else {
            cart.push(CartReference::new(product_id.clone(), quantity));
        }
        Ok(cart.clone())
    }
}
