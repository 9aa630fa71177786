//! Collaborators the storefront depends on.
//!
//! The session store lives in `storefront-auth` and is synchronous; these two
//! wait on the network.

use async_trait::async_trait;

use storefront_auth::AuthToken;
use storefront_cart::CartReference;
use storefront_catalog::{Catalog, CatalogQuery, ProductId};

use crate::error::RemoteError;

/// Where products come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog, optionally narrowed by `query`.
    async fn fetch_catalog(&self, query: Option<&CatalogQuery>) -> Result<Catalog, RemoteError>;
}

/// The authoritative cart, kept by the backend per user.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Current references for the token's user. No token means an empty cart.
    async fn fetch_cart(&self, token: Option<&AuthToken>) -> Result<Vec<CartReference>, RemoteError>;

    /// Set `product_id` to `quantity` (0 removes it) and return the whole cart
    /// afterwards.
    async fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartReference>, RemoteError>;
}
