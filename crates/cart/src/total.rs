use serde::{Deserialize, Serialize};

use crate::item::CartItem;

/// Shipping is free.
pub const SHIPPING_CHARGE: f64 = 0.0;

/// Sum of `cost * quantity` over `items`, left to right. Empty carts total 0.
///
/// Raw number; rounding and currency formatting belong to whoever displays it.
pub fn total_value(items: &[CartItem]) -> f64 {
    items.iter().fold(0.0, |total, item| total + item.line_total())
}

/// Read-only order details shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Number of cart lines.
    pub product_count: usize,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn from_items(items: &[CartItem]) -> Self {
        let subtotal = total_value(items);
        Self {
            product_count: items.len(),
            subtotal,
            shipping: SHIPPING_CHARGE,
            total: subtotal + SHIPPING_CHARGE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.product_count == 0
    }

    /// Whether a wallet holding `balance` can pay for the order.
    pub fn covered_by(&self, balance: f64) -> bool {
        balance >= self.total
    }

    /// Wallet balance left after paying; negative when it falls short.
    pub fn balance_after(&self, balance: f64) -> f64 {
        balance - self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{Product, ProductId};

    fn item(id: &str, cost: f64, quantity: u32) -> CartItem {
        let product = Product::new(ProductId::new(id).unwrap(), id, "Misc", cost, 0, "").unwrap();
        CartItem::new(product, quantity)
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(total_value(&[]), 0.0);
    }

    #[test]
    fn sums_cost_times_quantity() {
        let items = [item("a", 100.0, 2), item("b", 50.0, 1)];
        assert_eq!(total_value(&items), 250.0);
    }

    #[test]
    fn zero_quantity_lines_contribute_nothing() {
        let items = [item("a", 100.0, 0), item("b", 5.0, 3)];
        assert_eq!(total_value(&items), 15.0);
    }

    #[test]
    fn summary_for_empty_cart() {
        let summary = CheckoutSummary::from_items(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.subtotal, 0.0);
        assert_eq!(summary.total, 0.0);
    }

    #[test]
    fn summary_counts_lines_and_adds_free_shipping() {
        let items = [item("a", 100.0, 2), item("b", 50.0, 1)];
        let summary = CheckoutSummary::from_items(&items);
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.subtotal, 250.0);
        assert_eq!(summary.shipping, 0.0);
        assert_eq!(summary.total, 250.0);
    }

    #[test]
    fn balance_checks() {
        let summary = CheckoutSummary::from_items(&[item("a", 100.0, 2)]);
        assert!(summary.covered_by(5000.0));
        assert!(summary.covered_by(200.0));
        assert!(!summary.covered_by(199.0));
        assert_eq!(summary.balance_after(5000.0), 4800.0);
        assert_eq!(summary.balance_after(150.0), -50.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: total equals the sum of line totals (integer-valued costs
            /// keep the comparison exact).
            #[test]
            fn total_is_sum_of_lines(lines in proptest::collection::vec((0u32..10_000, 0u32..100), 0..20)) {
                let items: Vec<_> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, &(cost, qty))| item(&format!("p{i}"), f64::from(cost), qty))
                    .collect();
                let expected: u64 = lines.iter().map(|&(c, q)| u64::from(c) * u64::from(q)).sum();
                prop_assert_eq!(total_value(&items), expected as f64);
            }

            /// Property: the checkout total never differs from the cart total.
            #[test]
            fn summary_total_matches_cart_total(lines in proptest::collection::vec((0u32..1_000, 0u32..50), 0..10)) {
                let items: Vec<_> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, &(cost, qty))| item(&format!("p{i}"), f64::from(cost), qty))
                    .collect();
                let summary = CheckoutSummary::from_items(&items);
                prop_assert_eq!(summary.total, total_value(&items));
                prop_assert_eq!(summary.product_count, items.len());
            }
        }
    }
}
