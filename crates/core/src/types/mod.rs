//! Shared commerce types.

pub mod cart;
pub mod customer;
pub mod email;
pub mod money;
pub mod totals;

pub use cart::{Cart, LineItem};
pub use customer::CustomerDetails;
pub use email::{Email, EmailError};
pub use money::format_eur;
pub use totals::{PricingPolicy, Totals, compute_totals};
