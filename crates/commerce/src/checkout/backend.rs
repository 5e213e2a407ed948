//! Payment backend collaborator.
//!
//! The remote backend creates checkout sessions / payment intents. It is a
//! plain request/response collaborator with unreliable availability: any
//! transport failure, non-2xx status, or malformed body is classified as
//! "unavailable" and the orchestrator falls back to the demo path rather
//! than failing the checkout.

use elysian_core::{CustomerDetails, LineItem};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors from the backend collaborator. All of them mean "unavailable"
/// to the orchestrator; the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Status(u16),

    /// Body did not match the session contract.
    #[error("malformed session response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Request body for session creation.
///
/// The cart-plus-customer form is the current contract. The optional
/// single-product fields are a legacy shape some callers still send from
/// product pages; they are omitted from the wire entirely when unset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest<'a> {
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub cart: &'a [LineItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<&'a CustomerDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
}

impl<'a> SessionRequest<'a> {
    /// The full-cart checkout shape.
    #[must_use]
    pub const fn for_cart(cart: &'a [LineItem], customer: &'a CustomerDetails) -> Self {
        Self {
            cart,
            customer: Some(customer),
            product_id: None,
            size: None,
            qty: None,
        }
    }

    /// The legacy single-product shape used by direct product-page
    /// checkout buttons.
    #[must_use]
    pub const fn for_product(product_id: &'a str, size: &'a str, qty: u32) -> Self {
        Self {
            cart: &[],
            customer: None,
            product_id: Some(product_id),
            size: Some(size),
            qty: Some(qty),
        }
    }
}

/// Successful session response.
///
/// Depending on the flow the backend returns a redirect session `id` or a
/// payment-intent `clientSecret`. Only the client secret is confirmable
/// through the payment provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl SessionResponse {
    /// The token the payment provider can confirm, if the backend issued
    /// one.
    #[must_use]
    pub fn confirmable_token(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}

/// The backend seam the orchestrator talks through.
#[allow(async_fn_in_trait)]
pub trait CheckoutBackend {
    /// Create a checkout session / payment intent for the request.
    ///
    /// # Errors
    ///
    /// Any [`BackendError`] is treated as backend unavailability.
    async fn create_session(
        &self,
        request: &SessionRequest<'_>,
    ) -> Result<SessionResponse, BackendError>;
}

/// HTTP implementation POSTing JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    /// Create a backend client for the endpoint.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl CheckoutBackend for HttpBackend {
    async fn create_session(
        &self,
        request: &SessionRequest<'_>,
    ) -> Result<SessionResponse, BackendError> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
