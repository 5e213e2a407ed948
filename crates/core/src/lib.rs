//! Elysian Core - Shared commerce types.
//!
//! This crate provides the types shared by the Elysian commerce components:
//! - `commerce` - Client-side cart, rendering, and checkout core
//! - `integration-tests` - End-to-end scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Line items, carts, money formatting, emails, customer
//!   details, and checkout totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
