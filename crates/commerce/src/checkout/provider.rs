//! Payment provider collaborator.
//!
//! The external payment-capture provider (Stripe in production) is a
//! capability the core can use when present, never a requirement: the
//! orchestrator takes `Option<P>` and degrades to the demo path when no
//! provider is configured. Its internal protocol is out of scope; only the
//! confirmation call shape is modeled here.

use thiserror::Error;

/// Billing details forwarded with a confirmation attempt. The provider
/// pairs these with its own mounted card-capture surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
}

/// Terminal outcome of a confirmation call that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentConfirmation {
    /// The provider reports the payment captured.
    Succeeded,
    /// Any other terminal status; carries the raw status for the inline
    /// message. Treated as unconfirmed, never as success.
    Unconfirmed(String),
}

/// Provider-reported failure with a human-readable message suitable for
/// inline display (card declined, authentication failed, ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    /// Wrap a provider message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The confirmation seam onto the payment provider.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Confirm the payment for a backend-issued client secret.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] whose message is surfaced to the
    /// customer inline; the submission stays resubmittable.
    async fn confirm_payment(
        &self,
        client_secret: &str,
        billing: &BillingDetails,
    ) -> Result<PaymentConfirmation, ProviderError>;
}

/// Placeholder provider type for hosts that run without one.
///
/// Uninhabited: `Option<NoProvider>` can only ever be `None`, which is the
/// supported degraded mode.
#[derive(Debug, Clone, Copy)]
pub enum NoProvider {}

impl PaymentProvider for NoProvider {
    async fn confirm_payment(
        &self,
        _client_secret: &str,
        _billing: &BillingDetails,
    ) -> Result<PaymentConfirmation, ProviderError> {
        match *self {}
    }
}
