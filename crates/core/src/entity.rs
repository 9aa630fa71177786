//! Entities are told apart by identifier, not by value.

/// An object with a stable identifier.
///
/// Catalog products are entities: two snapshots of the same product fetched at
/// different times share an `id` even when price or rating changed in between.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
