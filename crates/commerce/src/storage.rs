//! Durable, tab-shared key/value storage.
//!
//! The cart persists in a synchronous string store shared by every open tab
//! of the storefront. The store itself is external (the browser's storage
//! layer in production); this module defines the seam the rest of the crate
//! programs against, plus an in-memory implementation with the same
//! semantics for tests, demos, and non-browser hosts.
//!
//! Conflicting writes from different tabs resolve last-write-wins at the
//! storage layer. There is no locking and no merge: the store is the
//! serialization point.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

/// Capacity of the cross-tab event channel. Lagging subscribers drop the
/// oldest events, which is acceptable: reconcilers re-read the full store
/// on every event anyway.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A durable, synchronous, tab-shared string store.
///
/// Mirrors the web storage contract the production host provides: string
/// keys, string values, last write wins.
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Delete `key` entirely; no-op when absent.
    fn remove(&self, key: &str);
}

/// Identifies one tab's handle onto the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

/// A storage mutation observed on the shared store.
///
/// Carries the mutated key and the originating tab so reconcilers can
/// ignore their own writes, matching the browser behavior where storage
/// events only fire in *other* tabs.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// The tab whose write produced the event.
    pub origin: TabId,
}

struct SharedInner {
    data: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    next_tab: AtomicU64,
}

/// In-memory tab-shared storage with change events.
///
/// Clones share the same underlying map. Open one handle per simulated tab
/// via [`SharedStorage::open_tab`].
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<SharedInner>,
}

impl SharedStorage {
    /// Create an empty shared store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SharedInner {
                data: Mutex::new(HashMap::new()),
                events,
                next_tab: AtomicU64::new(0),
            }),
        }
    }

    /// Open a new tab handle onto this store.
    #[must_use]
    pub fn open_tab(&self) -> TabStorage {
        let id = TabId(self.inner.next_tab.fetch_add(1, Ordering::Relaxed));
        TabStorage {
            shared: self.clone(),
            id,
        }
    }

    fn data(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, key: &str, origin: TabId) {
        // No receivers is fine; events are best-effort fan-out.
        let _ = self.inner.events.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
    }
}

impl Default for SharedStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// One tab's handle onto a [`SharedStorage`].
///
/// Writes through this handle are visible to every other handle and emit a
/// [`StorageEvent`] tagged with this tab's id.
#[derive(Clone)]
pub struct TabStorage {
    shared: SharedStorage,
    id: TabId,
}

impl TabStorage {
    /// This tab's identity.
    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    /// Subscribe to mutations on the shared store.
    ///
    /// The stream includes this tab's own writes; reconcilers filter on
    /// [`StorageEvent::origin`].
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.inner.events.subscribe()
    }
}

impl StorageBackend for TabStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.shared.data().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let changed = {
            let mut data = self.shared.data();
            let previous = data.insert(key.to_string(), value.to_string());
            previous.as_deref() != Some(value)
        };
        // The browser only fires storage events on actual change.
        if changed {
            self.shared.notify(key, self.id);
        }
    }

    fn remove(&self, key: &str) {
        let existed = self.shared.data().remove(key).is_some();
        if existed {
            self.shared.notify(key, self.id);
        }
    }
}
