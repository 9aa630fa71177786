//! Cart domain module.
//!
//! Pure, deterministic cart logic (no IO, no HTTP, no storage):
//! - joining the sparse reference list against the catalog,
//! - totals and the checkout summary,
//! - validating quantity changes before they are sent anywhere,
//! - the displayed cart state that authoritative responses replace.

pub mod item;
pub mod mutation;
pub mod reconcile;
pub mod reference;
pub mod total;
pub mod view;

pub use item::CartItem;
pub use mutation::{
    CartUpdate, MutationError, MutationKind, MutationRequest, MutationState, Notice,
    PendingMutations, validate,
};
pub use reconcile::reconcile;
pub use reference::CartReference;
pub use total::{CheckoutSummary, SHIPPING_CHARGE, total_value};
pub use view::CartView;
