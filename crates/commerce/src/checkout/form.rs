//! Checkout form validation.
//!
//! Validation failures are field-scoped and non-fatal: every failing field
//! gets its own inline message, the submission aborts, and no state is
//! mutated anywhere.

use elysian_core::{CustomerDetails, Email};

/// Minimum accepted full-name length, after trimming.
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum accepted address length, after trimming.
pub const MIN_ADDRESS_LENGTH: usize = 6;

/// Raw checkout form state as read from the input surface.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub phone: Option<String>,
    /// The student checkbox; feeds the discount signal, not validation.
    pub student: bool,
}

/// Per-field inline validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl FieldErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.address.is_none()
    }
}

/// Validate the form, collecting a message for every failing field.
///
/// # Errors
///
/// Returns the field-scoped messages when any field fails; the caller
/// surfaces them inline and aborts the submission.
pub fn validate(form: &CheckoutForm) -> Result<CustomerDetails, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = form.full_name.trim();
    if name.len() < MIN_NAME_LENGTH {
        errors.full_name = Some("Please enter your full name".to_string());
    }

    let email = Email::parse(form.email.trim());
    if email.is_err() {
        errors.email = Some("Invalid email address".to_string());
    }

    let address = form.address.trim();
    if address.len() < MIN_ADDRESS_LENGTH {
        errors.address = Some("Address is too short".to_string());
    }

    match email {
        Ok(email) if errors.is_empty() => Ok(CustomerDetails {
            name: name.to_string(),
            email,
            address: address.to_string(),
            phone: form
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string),
        }),
        _ => Err(errors),
    }
}
