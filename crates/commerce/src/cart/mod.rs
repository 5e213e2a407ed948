//! Cart persistence, reconciliation, and rendering.
//!
//! - [`store`] - the canonical cart store and its in-tab change signal
//! - [`watch`] - debounced reconciliation of changes made by other tabs
//! - [`render`] - view projection, templates, and delegated controls

pub mod render;
pub mod store;
pub mod watch;

pub use render::{AlwaysConfirm, CartControl, CartView, CartViewModel, RemovalPrompt, RenderMode};
pub use store::{CartChanged, CartStore};
pub use watch::spawn_external_reconciler;
