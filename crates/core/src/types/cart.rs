//! Cart line items and the cart collection.
//!
//! A line item is identified by its `(id, size)` pair: the same product in
//! two sizes is two separate lines, the same product in the same size is
//! always a single line whose quantity accumulates. Insertion order is
//! preserved because it drives rendering order; it has no pricing meaning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `(product, size)` entry in the cart.
///
/// `price` is locked in when the item is first added; re-adding the same
/// pair accumulates quantity but never updates the price. `name` and
/// `image` are display-only and carry no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Opaque product identifier, stable per product.
    pub id: String,
    /// Selected size; part of the line identity.
    pub size: String,
    /// Display name.
    pub name: String,
    /// Display image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price in the currency's standard unit.
    pub price: Decimal,
    /// Quantity; always >= 1 while the line exists.
    pub qty: u32,
}

impl LineItem {
    /// Whether this line matches the given `(id, size)` identity pair.
    #[must_use]
    pub fn matches(&self, id: &str, size: &str) -> bool {
        self.id == id && self.size == size
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// An ordered collection of line items.
///
/// All mutation entry points maintain the one-line-per-`(id, size)`
/// invariant. The collection itself is pure data; persistence and change
/// notification live in `elysian-commerce`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<LineItem>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of quantities across all lines (the counter badge value).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.0.iter().map(|item| item.qty).sum()
    }

    /// Find the line matching `(id, size)`, if present.
    #[must_use]
    pub fn find(&self, id: &str, size: &str) -> Option<&LineItem> {
        self.0.iter().find(|item| item.matches(id, size))
    }

    /// Add an item, merging into an existing `(id, size)` line if present.
    ///
    /// Merging accumulates quantity; the existing line's price and display
    /// fields are kept as-is.
    pub fn add(&mut self, item: LineItem) {
        match self.0.iter_mut().find(|l| l.matches(&item.id, &item.size)) {
            Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
            None => self.0.push(item),
        }
    }

    /// Overwrite the quantity of the `(id, size)` line.
    ///
    /// A quantity of zero or below removes the line. Returns `false` when
    /// no line matches, leaving the cart untouched.
    pub fn set_quantity(&mut self, id: &str, size: &str, qty: i64) -> bool {
        let Some(idx) = self.0.iter().position(|item| item.matches(id, size)) else {
            return false;
        };
        if qty <= 0 {
            self.0.remove(idx);
        } else if let Some(item) = self.0.get_mut(idx) {
            item.qty = u32::try_from(qty).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove the `(id, size)` line entirely; no-op when absent.
    pub fn remove(&mut self, id: &str, size: &str) {
        self.0.retain(|item| !item.matches(id, size));
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Self::empty();
        for item in iter {
            cart.add(item);
        }
        cart
    }
}
