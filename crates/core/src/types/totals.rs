//! Checkout totals computation.
//!
//! Pure derivation from a cart snapshot: same items and discount flag in,
//! same totals out. Nothing here is persisted; callers recompute whenever
//! the cart changes.

use rust_decimal::Decimal;
use serde::Serialize;

use super::cart::LineItem;

/// Pricing configuration applied by [`compute_totals`].
///
/// These are configuration values, not business logic: hosts load them from
/// the environment and pass them through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat shipping fee charged below the free-shipping threshold.
    pub flat_shipping_fee: Decimal,
    /// Shipping is waived strictly above this subtotal; exactly at the
    /// threshold the fee is still due.
    pub free_shipping_threshold: Decimal,
    /// Rate deducted from the subtotal when the student signal is set
    /// (0.10 = 10%).
    pub student_discount_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            flat_shipping_fee: Decimal::from(4),
            free_shipping_threshold: Decimal::from(100),
            student_discount_rate: Decimal::new(10, 2),
        }
    }
}

/// Derived totals for a cart snapshot at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of line totals, after any student discount.
    pub subtotal: Decimal,
    /// Flat fee, or zero when waived.
    pub shipping: Decimal,
    /// `subtotal + shipping`.
    pub total: Decimal,
}

impl Totals {
    /// Totals for an empty cart: all zero, shipping vacuously waived.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Compute subtotal, shipping, and total for the given items.
///
/// Shipping is waived both when the subtotal exceeds the threshold and
/// vacuously when the cart is empty; an empty cart is not an error. The
/// student discount, when flagged, is applied to the subtotal before the
/// shipping threshold is evaluated.
#[must_use]
pub fn compute_totals(items: &[LineItem], student_discount: bool, policy: &PricingPolicy) -> Totals {
    let mut subtotal: Decimal = items.iter().map(LineItem::line_total).sum();

    if student_discount {
        subtotal *= Decimal::ONE - policy.student_discount_rate;
    }

    let shipping = if subtotal.is_zero() || subtotal > policy.free_shipping_threshold {
        Decimal::ZERO
    } else {
        policy.flat_shipping_fee
    };

    Totals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(price: Decimal, qty: u32) -> LineItem {
        LineItem {
            id: "p1".to_string(),
            size: "M".to_string(),
            name: "Tee".to_string(),
            image: None,
            price,
            qty,
        }
    }

    #[test]
    fn test_single_item_with_flat_shipping() {
        let items = vec![item(Decimal::from(45), 1)];
        let totals = compute_totals(&items, false, &PricingPolicy::default());

        assert_eq!(totals.subtotal, Decimal::from(45));
        assert_eq!(totals.shipping, Decimal::from(4));
        assert_eq!(totals.total, Decimal::from(49));
    }

    #[test]
    fn test_empty_cart_has_zero_shipping() {
        let totals = compute_totals(&[], false, &PricingPolicy::default());
        assert_eq!(totals, Totals::zero());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 100 still pays the fee.
        let at = compute_totals(
            &[item(Decimal::from(100), 1)],
            false,
            &PricingPolicy::default(),
        );
        assert_eq!(at.shipping, Decimal::from(4));
        assert_eq!(at.total, Decimal::from(104));

        // 100.01 is over the threshold.
        let over = compute_totals(
            &[item(Decimal::new(100_01, 2), 1)],
            false,
            &PricingPolicy::default(),
        );
        assert_eq!(over.shipping, Decimal::ZERO);
        assert_eq!(over.total, Decimal::new(100_01, 2));
    }

    #[test]
    fn test_student_discount_applied_to_subtotal() {
        let items = vec![item(Decimal::from(50), 2)];
        let totals = compute_totals(&items, true, &PricingPolicy::default());

        // 100 * 0.9 = 90, under the threshold so the fee applies.
        assert_eq!(totals.subtotal, Decimal::new(9000, 2));
        assert_eq!(totals.shipping, Decimal::from(4));
        assert_eq!(totals.total, Decimal::new(9400, 2));
    }

    #[test]
    fn test_discount_evaluated_before_shipping_threshold() {
        // 110 gross would ship free, but the discounted 99 does not.
        let items = vec![item(Decimal::from(110), 1)];
        let totals = compute_totals(&items, true, &PricingPolicy::default());

        assert_eq!(totals.subtotal, Decimal::new(9900, 2));
        assert_eq!(totals.shipping, Decimal::from(4));
    }

    #[test]
    fn test_pure_and_deterministic() {
        let items = vec![item(Decimal::new(4550, 2), 3)];
        let policy = PricingPolicy::default();

        let first = compute_totals(&items, true, &policy);
        let second = compute_totals(&items, true, &policy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_precision_retained() {
        let items = vec![item(Decimal::new(3333, 2), 3)];
        let totals = compute_totals(&items, false, &PricingPolicy::default());

        assert_eq!(totals.subtotal, Decimal::new(9999, 2));
        assert_eq!(totals.total, Decimal::new(103_99, 2));
    }
}
