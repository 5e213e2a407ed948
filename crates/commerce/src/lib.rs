//! Elysian Atelier commerce library.
//!
//! Client-side storefront commerce core: the persistent cart store with its
//! multi-view rendering, the totals engine, and checkout orchestration with
//! its payment-submission state machine. Hosts bind this crate to their
//! page surfaces; everything external (storage, payment backend, payment
//! provider, confirmation dialogs) enters through a trait seam.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod filters;
pub mod storage;
