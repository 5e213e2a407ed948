//! Integration tests for Elysian Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elysian-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - cart store, totals, and rendered views end to end
//! - `checkout_flow` - payment submission, fallback, and confirmation
//! - `multi_tab` - cross-tab storage reconciliation
//!
//! The tests run entirely in-process: shared storage stands in for the
//! persistence layer and the payment collaborators are canned fakes, so no
//! external service is required.
