//! Customer identity fields captured at checkout.

use serde::Serialize;

use super::email::Email;

/// Validated customer details attached to a checkout submission.
///
/// Transient data: consumed exactly once per submission attempt, never
/// persisted. Construction goes through the checkout form validation in
/// `elysian-commerce`, so a value of this type always carries fields that
/// passed the local checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    /// Full name as entered.
    pub name: String,
    /// Validated email address.
    pub email: Email,
    /// Shipping address, free-form.
    pub address: String,
    /// Optional phone number, passed through unvalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
