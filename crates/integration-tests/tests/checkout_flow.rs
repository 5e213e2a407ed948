//! Integration tests for the checkout flow.
//!
//! Runs the orchestrator end to end against canned payment collaborators:
//! validation, the student discount signal, real confirmation through a
//! provider, and the simulated fallback when the backend is unreachable.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use elysian_commerce::cart::CartStore;
use elysian_commerce::checkout::backend::{BackendError, CheckoutBackend, SessionRequest, SessionResponse};
use elysian_commerce::checkout::form::CheckoutForm;
use elysian_commerce::checkout::provider::{
    BillingDetails, NoProvider, PaymentConfirmation, PaymentProvider, ProviderError,
};
use elysian_commerce::checkout::{CheckoutOrchestrator, SubmitOutcome};
use elysian_commerce::config::CommerceConfig;
use elysian_commerce::storage::{SharedStorage, TabStorage};
use elysian_core::{LineItem, PricingPolicy};
use rust_decimal::Decimal;
use url::Url;

struct FlakyBackend {
    response: Result<&'static str, u16>,
}

impl CheckoutBackend for FlakyBackend {
    async fn create_session(
        &self,
        _request: &SessionRequest<'_>,
    ) -> Result<SessionResponse, BackendError> {
        match self.response {
            Ok(body) => Ok(serde_json::from_str(body)?),
            Err(status) => Err(BackendError::Status(status)),
        }
    }
}

struct CannedProvider(Result<PaymentConfirmation, ProviderError>);

impl PaymentProvider for CannedProvider {
    async fn confirm_payment(
        &self,
        _client_secret: &str,
        _billing: &BillingDetails,
    ) -> Result<PaymentConfirmation, ProviderError> {
        self.0.clone()
    }
}

fn config() -> CommerceConfig {
    CommerceConfig {
        storage_key: "cart".to_string(),
        pricing: PricingPolicy::default(),
        academic_fragments: vec![".edu".to_string(), ".ac.uk".to_string()],
        external_settle: Duration::from_millis(1),
        fallback_delay: Duration::from_millis(5),
        checkout_endpoint: Url::parse("http://localhost:3000/create-payment-intent").unwrap(),
        stripe_publishable_key: None,
    }
}

fn seeded_store() -> CartStore<TabStorage> {
    let store = CartStore::new(SharedStorage::new().open_tab(), "cart");
    store.add(LineItem {
        id: "tee".to_string(),
        size: "M".to_string(),
        name: "Charcoal Tee".to_string(),
        image: None,
        price: Decimal::from(45),
        qty: 1,
    });
    store
}

fn form() -> CheckoutForm {
    CheckoutForm {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 Rue des Mathematiques, Paris".to_string(),
        phone: None,
        student: false,
    }
}

// =============================================================================
// Demo Fallback
// =============================================================================

#[tokio::test]
async fn test_backend_down_still_completes_the_order() {
    let store = seeded_store();
    let mut checkout: CheckoutOrchestrator<_, _, NoProvider> = CheckoutOrchestrator::new(
        store.clone(),
        FlakyBackend { response: Err(503) },
        None,
        &config(),
    );

    let SubmitOutcome::Completed(confirmation) = checkout.submit(&form()).await else {
        panic!("expected completion");
    };

    assert!(confirmation.demo);
    assert_eq!(confirmation.totals.total, Decimal::from(49));
    assert!(store.get().is_empty());

    let html = checkout.render_confirmation().unwrap().unwrap();
    assert!(html.contains("demo mode"));
}

// =============================================================================
// Provider Confirmation
// =============================================================================

#[tokio::test]
async fn test_intent_confirmed_by_provider() {
    let store = seeded_store();
    let mut checkout = CheckoutOrchestrator::new(
        store.clone(),
        FlakyBackend {
            response: Ok(r#"{"clientSecret":"pi_123_secret"}"#),
        },
        Some(CannedProvider(Ok(PaymentConfirmation::Succeeded))),
        &config(),
    );

    let SubmitOutcome::Completed(confirmation) = checkout.submit(&form()).await else {
        panic!("expected completion");
    };
    assert!(!confirmation.demo);
    assert!(store.get().is_empty());

    let html = checkout.render_confirmation().unwrap().unwrap();
    assert!(html.contains("Order confirmed."));
    assert!(!html.contains("demo"));
}

#[tokio::test]
async fn test_decline_keeps_cart_and_allows_resubmission() {
    let store = seeded_store();
    let mut checkout = CheckoutOrchestrator::new(
        store.clone(),
        FlakyBackend {
            response: Ok(r#"{"clientSecret":"pi_123_secret"}"#),
        },
        Some(CannedProvider(Err(ProviderError::new(
            "Your card was declined.",
        )))),
        &config(),
    );

    let outcome = checkout.submit(&form()).await;
    assert!(matches!(outcome, SubmitOutcome::Declined { ref message } if message.contains("declined")));
    assert_eq!(store.get().len(), 1);
    assert!(!checkout.gate().is_engaged());

    // Same orchestrator accepts another attempt.
    let retry = checkout.submit(&form()).await;
    assert!(matches!(retry, SubmitOutcome::Declined { .. }));
}

// =============================================================================
// Student Discount
// =============================================================================

#[tokio::test]
async fn test_academic_email_discounts_the_submitted_totals() {
    let store = seeded_store();
    let mut checkout: CheckoutOrchestrator<_, _, NoProvider> = CheckoutOrchestrator::new(
        store,
        FlakyBackend { response: Err(503) },
        None,
        &config(),
    );

    let student = CheckoutForm {
        email: "ada@mit.edu".to_string(),
        ..form()
    };

    // The summary aside and the submitted order agree on the discount.
    let summary = checkout.render_summary(&student).unwrap();
    assert!(summary.contains("40.50€"));

    let SubmitOutcome::Completed(confirmation) = checkout.submit(&student).await else {
        panic!("expected completion");
    };
    assert_eq!(confirmation.totals.subtotal, Decimal::new(4050, 2));
    assert_eq!(confirmation.totals.total, Decimal::new(4450, 2));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_form_never_reaches_the_backend() {
    let store = seeded_store();
    let mut checkout: CheckoutOrchestrator<_, _, NoProvider> = CheckoutOrchestrator::new(
        store.clone(),
        FlakyBackend {
            // A malformed body would fail if the call happened; rejection
            // must come from validation, not from here.
            response: Ok("<html>"),
        },
        None,
        &config(),
    );

    let bad = CheckoutForm {
        full_name: "A".to_string(),
        email: "not an email".to_string(),
        address: "x".to_string(),
        phone: None,
        student: false,
    };

    let SubmitOutcome::Rejected(errors) = checkout.submit(&bad).await else {
        panic!("expected rejection");
    };
    assert!(errors.full_name.is_some());
    assert!(errors.email.is_some());
    assert!(errors.address.is_some());
    assert_eq!(store.get().len(), 1);
    assert!(!checkout.gate().is_engaged());
}
