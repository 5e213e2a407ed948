//! Debounced external-change reconciliation.
//!
//! Another tab writing the cart key is observed through the storage event
//! stream. Rather than racing the write, the reconciler waits a short
//! settle window before re-firing the local change signal, at which point
//! subscribers re-read the full store. The staleness this tolerates is
//! bounded by the configured window (see `CommerceConfig::external_settle`).

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cart::store::CartStore;
use crate::storage::{StorageEvent, TabStorage};

/// Spawn the reconciliation task for one tab's store.
///
/// The task ignores this tab's own writes and events for unrelated keys.
/// After `settle` has elapsed following an external write to the cart key,
/// the store's in-tab change signal fires exactly as if the mutation had
/// happened locally, so every subscriber repaints from the same path. A
/// burst of writes inside one window fires the signal once.
///
/// The task ends when the storage event channel closes.
pub fn spawn_external_reconciler(store: CartStore<TabStorage>, settle: Duration) -> JoinHandle<()> {
    let own = store.storage().id();
    let mut events = store.storage().changes();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if event.origin == own || event.key != store.key() {
                        continue;
                    }
                    debug!(key = %event.key, origin = ?event.origin, "External cart change observed");
                    tokio::time::sleep(settle).await;
                    drain(&mut events);
                    store.notify();
                }
                // Dropped events are indistinguishable from one coalesced
                // change; a single re-read covers them all.
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Storage event stream lagged, reconciling once");
                    tokio::time::sleep(settle).await;
                    drain(&mut events);
                    store.notify();
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Discard every event already queued, so writes that landed during the
/// settle window collapse into the single re-read that follows. Skipped
/// events would either have been filtered out anyway or are covered by
/// that re-read.
fn drain(events: &mut broadcast::Receiver<StorageEvent>) {
    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
