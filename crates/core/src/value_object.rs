//! Value objects: equality by value, not identity.
//!
//! A cart reference `{productId: "A", quantity: 3}` is a value object: two
//! references with the same fields are interchangeable, and "changing" one means
//! building a new one. Cart items derived by reconciliation follow the same rule;
//! they are rebuilt from scratch, never patched in place.

/// Marker trait for immutable values compared field by field.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Line { sku: String, qty: u32 }
///
/// impl ValueObject for Line {}
///
/// let a = Line { sku: "A".into(), qty: 1 };
/// assert_eq!(a.clone(), a);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// Returns a copy with `f` applied, leaving `self` untouched.
    fn with(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        f(&mut next);
        next
    }
}
