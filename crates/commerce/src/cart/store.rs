//! The canonical cart store.
//!
//! Exclusively owns write access to the persisted cart. Every operation is
//! read-modify-write against the shared storage on each call: no in-memory
//! copy is ever trusted as source of truth, because another tab may have
//! mutated the store in between. Mutations persist first, then fan out a
//! payloadless change notification to in-tab subscribers.

use elysian_core::{Cart, LineItem};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::storage::StorageBackend;

/// Capacity of the in-tab change channel.
const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// Payloadless signal that the persisted cart changed.
///
/// Subscribers react by re-reading the store; the event intentionally
/// carries no data so there is nothing stale to act on.
#[derive(Debug, Clone, Copy)]
pub struct CartChanged;

/// Store for the persisted cart, generic over the storage seam.
///
/// Cheap to clone; clones share the same change channel.
#[derive(Clone)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    changes: broadcast::Sender<CartChanged>,
}

impl<S: StorageBackend> CartStore<S> {
    /// Create a store persisting under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            storage,
            key: key.into(),
            changes,
        }
    }

    /// The storage key this store persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Subscribe to in-tab change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.changes.subscribe()
    }

    /// Read and deserialize the persisted cart.
    ///
    /// An absent or unparsable value resolves to an empty cart, never an
    /// error: a corrupt store must not take the page down.
    #[must_use]
    pub fn get(&self) -> Cart {
        let Some(raw) = self.storage.get(&self.key) else {
            return Cart::empty();
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Unparsable persisted cart, treating as empty");
                Cart::empty()
            }
        }
    }

    /// Add an item, merging quantity into an existing `(id, size)` line.
    ///
    /// Zero-quantity inputs are dropped; a line never exists with qty 0.
    pub fn add(&self, item: LineItem) {
        if item.qty == 0 {
            debug!(id = %item.id, size = %item.size, "Ignoring zero-quantity add");
            return;
        }
        let mut cart = self.get();
        cart.add(item);
        self.persist(&cart);
        self.notify();
    }

    /// Overwrite the quantity of the `(id, size)` line.
    ///
    /// Zero or below removes the line. Returns `false` without persisting
    /// or notifying when no line matches.
    pub fn set_quantity(&self, id: &str, size: &str, qty: i64) -> bool {
        let mut cart = self.get();
        if !cart.set_quantity(id, size, qty) {
            return false;
        }
        self.persist(&cart);
        self.notify();
        true
    }

    /// Remove the `(id, size)` line entirely; still persists and notifies
    /// when the line was absent, matching a plain filter-and-save.
    pub fn remove(&self, id: &str, size: &str) {
        let mut cart = self.get();
        cart.remove(id, size);
        self.persist(&cart);
        self.notify();
    }

    /// Delete the persisted cart entirely.
    pub fn clear(&self) {
        self.storage.remove(&self.key);
        self.notify();
    }

    /// Sum of quantities across all lines, for the counter badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.get().total_quantity()
    }

    fn persist(&self, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(json) => self.storage.set(&self.key, &json),
            // Line items serialize infallibly in practice; losing a write
            // is still better than panicking mid-interaction.
            Err(e) => warn!(key = %self.key, error = %e, "Failed to serialize cart"),
        }
    }

    pub(crate) fn notify(&self) {
        let _ = self.changes.send(CartChanged);
    }

    pub(crate) const fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elysian_core::Cart;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::SharedStorage;

    fn item(id: &str, size: &str, qty: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            size: size.to_string(),
            name: format!("Product {id}"),
            image: Some(format!("/img/{id}.png")),
            price: Decimal::from(45),
            qty,
        }
    }

    fn store() -> CartStore<crate::storage::TabStorage> {
        CartStore::new(SharedStorage::new().open_tab(), "cart")
    }

    #[test]
    fn test_get_on_fresh_store_is_empty() {
        assert!(store().get().is_empty());
    }

    #[test]
    fn test_add_twice_accumulates_quantity() {
        let store = store();
        store.add(item("p1", "M", 1));
        store.add(item("p1", "M", 2));

        let cart = store.get();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.find("p1", "M").unwrap().qty, 3);
    }

    #[test]
    fn test_zero_quantity_add_is_dropped() {
        let store = store();
        store.add(item("p1", "M", 0));
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites_exactly() {
        let store = store();
        store.add(item("p1", "M", 1));

        assert!(store.set_quantity("p1", "M", 7));
        assert_eq!(store.get().find("p1", "M").unwrap().qty, 7);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let store = store();
        store.add(item("p1", "M", 2));

        assert!(store.set_quantity("p1", "M", 0));
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_set_quantity_not_found_signals_and_skips_notify() {
        let store = store();
        store.add(item("p1", "M", 2));
        let mut changes = store.subscribe();

        assert!(!store.set_quantity("p9", "M", 1));
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_remove_then_get() {
        let store = store();
        store.add(item("p1", "M", 1));
        store.add(item("p2", "S", 1));

        store.remove("p1", "M");
        let cart = store.get();
        assert_eq!(cart.len(), 1);
        assert!(cart.find("p2", "S").is_some());
    }

    #[test]
    fn test_clear_deletes_persisted_value() {
        let shared = SharedStorage::new();
        let tab = shared.open_tab();
        let store = CartStore::new(tab.clone(), "cart");

        store.add(item("p1", "M", 1));
        assert!(crate::storage::StorageBackend::get(&tab, "cart").is_some());

        store.clear();
        assert!(crate::storage::StorageBackend::get(&tab, "cart").is_none());
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_malformed_persisted_value_reads_as_empty() {
        let shared = SharedStorage::new();
        let tab = shared.open_tab();
        tab.set("cart", "{not json!");

        let store = CartStore::new(tab, "cart");
        assert_eq!(store.get(), Cart::empty());
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let store = store();
        let mut changes = store.subscribe();

        store.add(item("p1", "M", 1));
        assert!(changes.try_recv().is_ok());

        store.set_quantity("p1", "M", 2);
        assert!(changes.try_recv().is_ok());

        store.clear();
        assert!(changes.try_recv().is_ok());
    }

    #[test]
    fn test_reads_state_written_by_another_tab() {
        let shared = SharedStorage::new();
        let store_a = CartStore::new(shared.open_tab(), "cart");
        let store_b = CartStore::new(shared.open_tab(), "cart");

        store_a.add(item("p1", "M", 2));
        assert_eq!(store_b.get(), store_a.get());
    }

    #[test]
    fn test_total_quantity() {
        let store = store();
        store.add(item("p1", "M", 2));
        store.add(item("p2", "S", 3));
        assert_eq!(store.total_quantity(), 5);
    }
}
