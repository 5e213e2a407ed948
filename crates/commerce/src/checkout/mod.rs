//! Checkout orchestration.
//!
//! Drives the multi-step checkout flow and the payment submission state
//! machine. The submission path has exactly three suspension points: the
//! backend session call, the provider confirmation, and the fixed delay on
//! the demo fallback. While any of them is pending the submit gate stays
//! engaged, which is the whole concurrency story: one outstanding
//! submission per orchestrator, guarded by the disabled submit control.
//!
//! No failure here is fatal to the page. The worst outcome is a
//! resubmittable attempt with the cart intact.

pub mod backend;
pub mod discount;
pub mod form;
pub mod provider;
pub mod steps;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use askama::Template;
use chrono::{DateTime, Utc};
use elysian_core::{PricingPolicy, Totals, compute_totals};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[allow(unused_imports)]
use crate::filters;

use crate::cart::render::CartViewModel;
use crate::cart::store::CartStore;
use crate::config::CommerceConfig;
use crate::storage::StorageBackend;

use backend::{CheckoutBackend, SessionRequest};
use form::{CheckoutForm, FieldErrors};
use provider::{BillingDetails, PaymentConfirmation, PaymentProvider};
use steps::StepTracker;

/// Number of checkout sections (cart review, details, payment).
pub const CHECKOUT_STEP_COUNT: usize = 3;

/// Confirmation of a completed order, real or simulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    /// Reference shown to the customer.
    pub reference: Uuid,
    /// Whether this was the simulated path. The user-visible distinction
    /// is mandatory; the confirmation surface renders it explicitly.
    pub demo: bool,
    /// Totals snapshot at submission time.
    pub totals: Totals,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// Submission state machine: `Idle -> Submitting -> Succeeded`, with
/// recoverable failures returning to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing in flight; submission (or resubmission) is allowed.
    Idle,
    /// One submission attempt is outstanding.
    Submitting,
    /// Terminal: order completed, cart cleared, confirmation shown.
    Succeeded(OrderConfirmation),
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Payment completed (really or simulated); the cart was cleared.
    Completed(OrderConfirmation),
    /// Local validation failed; nothing was mutated.
    Rejected(FieldErrors),
    /// Provider declined or could not confirm; inline message, cart
    /// preserved, resubmittable.
    Declined { message: String },
    /// A submission was already outstanding; this one was refused.
    InFlight,
}

/// Observable submit-control state.
///
/// Engaged means the control is disabled and showing its busy label. Hosts
/// bind the button state to this; release is guaranteed on every exit path
/// of [`CheckoutOrchestrator::submit`], including unwinds.
#[derive(Debug, Clone, Default)]
pub struct SubmitGate {
    engaged: Arc<AtomicBool>,
}

impl SubmitGate {
    /// Whether a submission is currently outstanding.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }

    fn try_engage(&self) -> Option<GateGuard> {
        self.engaged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard {
                engaged: Arc::clone(&self.engaged),
            })
    }
}

/// RAII release of the submit gate; runs on normal exit and on unwind.
struct GateGuard {
    engaged: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.engaged.store(false, Ordering::Release);
    }
}

/// Order summary fragment for the checkout aside.
#[derive(Template)]
#[template(path = "checkout/summary.html")]
pub struct SummaryTemplate {
    pub cart: CartViewModel,
}

/// Confirmation surface, explicitly marked when simulated.
#[derive(Template)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate<'a> {
    pub confirmation: &'a OrderConfirmation,
}

/// The checkout orchestrator: step navigation plus payment submission.
pub struct CheckoutOrchestrator<S, B, P> {
    store: CartStore<S>,
    backend: B,
    provider: Option<P>,
    pricing: PricingPolicy,
    academic_fragments: Vec<String>,
    fallback_delay: std::time::Duration,
    steps: StepTracker,
    state: SubmissionState,
    gate: SubmitGate,
}

impl<S, B, P> CheckoutOrchestrator<S, B, P>
where
    S: StorageBackend,
    B: CheckoutBackend,
    P: PaymentProvider,
{
    /// Create an orchestrator over the store and collaborators.
    ///
    /// `provider` is `None` when no publishable credential was configured;
    /// that host still checks out through the demo path.
    pub fn new(store: CartStore<S>, backend: B, provider: Option<P>, config: &CommerceConfig) -> Self {
        Self {
            store,
            backend,
            provider,
            pricing: config.pricing.clone(),
            academic_fragments: config.academic_fragments.clone(),
            fallback_delay: config.fallback_delay,
            steps: StepTracker::new(CHECKOUT_STEP_COUNT),
            state: SubmissionState::Idle,
            gate: SubmitGate::default(),
        }
    }

    /// Current submission state.
    #[must_use]
    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Step navigation, read-only.
    #[must_use]
    pub const fn steps(&self) -> &StepTracker {
        &self.steps
    }

    /// Step navigation, for explicit forward/back requests.
    pub const fn steps_mut(&mut self) -> &mut StepTracker {
        &mut self.steps
    }

    /// The submit-control gate, for binding the button's disabled state.
    #[must_use]
    pub fn gate(&self) -> SubmitGate {
        self.gate.clone()
    }

    /// Render the order summary for the current cart and form state.
    ///
    /// Totals react to the discount signal so the aside stays consistent
    /// with what submission would charge.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(&self, form: &CheckoutForm) -> askama::Result<String> {
        let cart = self.store.get();
        let signal = discount::evaluate(&form.email, form.student, &self.academic_fragments);
        let totals = compute_totals(cart.items(), signal.eligible, &self.pricing);
        SummaryTemplate {
            cart: CartViewModel::with_totals(&cart, totals),
        }
        .render()
    }

    /// Render the confirmation surface, if the submission succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_confirmation(&self) -> askama::Result<Option<String>> {
        match &self.state {
            SubmissionState::Succeeded(confirmation) => {
                ConfirmationTemplate { confirmation }.render().map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Run one submission attempt end to end.
    ///
    /// Validation failures return before anything is touched. From there
    /// the attempt either confirms through the provider, is declined (cart
    /// preserved, resubmittable), or completes through the simulated path
    /// when backend or provider are unavailable. The submit gate is
    /// engaged for the whole attempt and released on every exit.
    #[instrument(skip(self, form))]
    pub async fn submit(&mut self, form: &CheckoutForm) -> SubmitOutcome {
        let customer = match form::validate(form) {
            Ok(customer) => customer,
            Err(errors) => return SubmitOutcome::Rejected(errors),
        };

        let Some(_guard) = self.gate.try_engage() else {
            return SubmitOutcome::InFlight;
        };
        self.state = SubmissionState::Submitting;

        // Snapshot cart and totals at submission time.
        let cart = self.store.get();
        let signal = discount::evaluate(&form.email, form.student, &self.academic_fragments);
        let totals = compute_totals(cart.items(), signal.eligible, &self.pricing);

        let request = SessionRequest::for_cart(cart.items(), &customer);
        let token = match self.backend.create_session(&request).await {
            Ok(session) => session.confirmable_token().map(str::to_owned),
            Err(e) => {
                warn!(error = %e, "Payment backend unavailable, falling back to demo mode");
                None
            }
        };

        if let (Some(token), Some(payment_provider)) = (token, self.provider.as_ref()) {
            let billing = BillingDetails {
                name: customer.name.clone(),
                email: customer.email.to_string(),
            };
            return match payment_provider.confirm_payment(&token, &billing).await {
                Ok(PaymentConfirmation::Succeeded) => self.complete(totals, false),
                Ok(PaymentConfirmation::Unconfirmed(status)) => {
                    warn!(status = %status, "Payment not confirmed");
                    self.state = SubmissionState::Idle;
                    SubmitOutcome::Declined {
                        message: "The payment could not be confirmed.".to_string(),
                    }
                }
                Err(e) => {
                    self.state = SubmissionState::Idle;
                    SubmitOutcome::Declined { message: e.message }
                }
            };
        }

        // Demo path: no backend session or no provider. The fixed delay
        // preserves the perceived submit-then-confirm rhythm.
        tokio::time::sleep(self.fallback_delay).await;
        self.complete(totals, true)
    }

    fn complete(&mut self, totals: Totals, demo: bool) -> SubmitOutcome {
        self.store.clear();
        let confirmation = OrderConfirmation {
            reference: Uuid::new_v4(),
            demo,
            totals,
            completed_at: Utc::now(),
        };
        info!(reference = %confirmation.reference, demo, "Order completed");
        self.state = SubmissionState::Succeeded(confirmation.clone());
        SubmitOutcome::Completed(confirmation)
    }
}
