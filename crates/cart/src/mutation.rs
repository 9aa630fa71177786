//! Quantity changes: what a user asked for, the local checks it must pass before
//! anything is sent, and the bookkeeping of requests still in flight.
//!
//! Every request carries the *target* quantity, never a delta. Replaying a
//! request, or receiving responses out of order, can only ever leave the cart at
//! one of the requested targets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_auth::AuthToken;
use storefront_catalog::{Catalog, ProductId};
use storefront_core::RequestId;

use crate::item::CartItem;

/// What the user did to trigger the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// "Add to cart" on a product card. With `prevent_duplicate`, a product that
    /// is already in the cart is refused instead of being reset to 1.
    AddToCart { prevent_duplicate: bool },
    Increment,
    Decrement,
    /// Direct target quantity.
    Set,
}

/// A user's request to move one product to a target quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub request_id: RequestId,
    pub product_id: ProductId,
    /// Signed so that a decrement below zero can be reported rather than wrap.
    pub quantity: i64,
    pub kind: MutationKind,
    pub requested_at: DateTime<Utc>,
}

impl MutationRequest {
    fn build(product_id: ProductId, quantity: i64, kind: MutationKind) -> Self {
        Self {
            request_id: RequestId::new(),
            product_id,
            quantity,
            kind,
            requested_at: Utc::now(),
        }
    }

    pub fn set(product_id: ProductId, quantity: i64) -> Self {
        Self::build(product_id, quantity, MutationKind::Set)
    }

    /// First add of a product: quantity 1.
    pub fn add_to_cart(product_id: ProductId, prevent_duplicate: bool) -> Self {
        Self::build(product_id, 1, MutationKind::AddToCart { prevent_duplicate })
    }

    pub fn increment(item: &CartItem) -> Self {
        Self::build(item.product_id().clone(), item.incremented(), MutationKind::Increment)
    }

    pub fn decrement(item: &CartItem) -> Self {
        Self::build(item.product_id().clone(), item.decremented(), MutationKind::Decrement)
    }
}

/// How the UI should surface a failed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Prompt the user to log in.
    Authenticate,
    /// Show a validation message; retrying unchanged will fail again.
    Validation,
    /// Show a transient notification; the cart is as it was before.
    Transient,
}

/// Why a quantity change did not happen.
///
/// None of these leave a trace in the displayed cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("login to add an item to the cart")]
    Unauthenticated,

    #[error("invalid quantity {0}: must be a non-negative integer")]
    InvalidQuantity(i64),

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("item already in cart; use the cart to update quantity or remove the item")]
    AlreadyInCart(ProductId),

    /// Network or server failure while talking to the cart backend.
    #[error("could not update the cart: {0}")]
    RemoteFailure(String),
}

impl MutationError {
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    pub fn notice(&self) -> Notice {
        match self {
            MutationError::Unauthenticated => Notice::Authenticate,
            MutationError::InvalidQuantity(_)
            | MutationError::UnknownProduct(_)
            | MutationError::AlreadyInCart(_) => Notice::Validation,
            MutationError::RemoteFailure(_) => Notice::Transient,
        }
    }
}

/// A request that passed local validation and may be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub request_id: RequestId,
    pub token: AuthToken,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartUpdate {
    /// Quantity 0 deletes the product's reference.
    pub fn is_removal(&self) -> bool {
        self.quantity == 0
    }
}

/// Check a request before any network effect, in this order:
/// credentials, quantity, product, then duplicate add.
pub fn validate(
    token: Option<&AuthToken>,
    current_items: &[CartItem],
    catalog: &Catalog,
    request: &MutationRequest,
) -> Result<CartUpdate, MutationError> {
    let token = token.ok_or(MutationError::Unauthenticated)?;

    let quantity = u32::try_from(request.quantity)
        .map_err(|_| MutationError::InvalidQuantity(request.quantity))?;

    if !catalog.contains(&request.product_id) {
        return Err(MutationError::UnknownProduct(request.product_id.clone()));
    }

    if let MutationKind::AddToCart {
        prevent_duplicate: true,
    } = request.kind
    {
        if current_items
            .iter()
            .any(|item| item.product_id() == &request.product_id)
        {
            return Err(MutationError::AlreadyInCart(request.product_id.clone()));
        }
    }

    Ok(CartUpdate {
        request_id: request.request_id,
        token: token.clone(),
        product_id: request.product_id.clone(),
        quantity,
    })
}

/// Per-product request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MutationState {
    Idle,
    /// At least one request for the product is awaiting its response.
    Pending { in_flight: usize },
}

/// Requests sent but not yet answered, per product.
///
/// Overlapping requests are not serialized; this only tracks them so the UI can
/// show a busy indicator.
#[derive(Debug, Clone, Default)]
pub struct PendingMutations {
    in_flight: HashMap<ProductId, Vec<RequestId>>,
}

impl PendingMutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Pending.
    pub fn begin(&mut self, product_id: &ProductId, request_id: RequestId) {
        self.in_flight
            .entry(product_id.clone())
            .or_default()
            .push(request_id);
    }

    /// Pending -> Idle once the last in-flight request for the product is done.
    /// Returns false for a request that was never begun.
    pub fn finish(&mut self, product_id: &ProductId, request_id: RequestId) -> bool {
        let Some(requests) = self.in_flight.get_mut(product_id) else {
            return false;
        };
        let Some(pos) = requests.iter().position(|r| *r == request_id) else {
            return false;
        };
        requests.remove(pos);
        if requests.is_empty() {
            self.in_flight.remove(product_id);
        }
        true
    }

    pub fn state(&self, product_id: &ProductId) -> MutationState {
        match self.in_flight.get(product_id) {
            Some(requests) if !requests.is_empty() => MutationState::Pending {
                in_flight: requests.len(),
            },
            _ => MutationState::Idle,
        }
    }
}
