//! Student discount eligibility signal.
//!
//! Eligibility is a loose heuristic: the customer email is matched
//! case-insensitively against configured academic-domain fragments as plain
//! substrings, not exact domains. False positives are accepted by design
//! (a personal domain containing one of the fragments will match).

/// Default academic-domain fragments. Kept conservative to limit false
/// positives; hosts can replace the list through configuration.
pub const DEFAULT_ACADEMIC_FRAGMENTS: &[&str] = &[
    ".edu",
    ".ac.uk",
    ".etu.",
    ".univ-",
    ".ac-",
    ".student.",
    ".edu.fr",
    ".utc.fr",
    "@etudiant.",
    "@alum.",
    ".oxon.org",
    ".cam.ac.uk",
    ".sorbonne",
    ".polytechnique",
    ".imt.fr",
    ".ecp.fr",
    ".epitech.",
];

/// Whether the email matches any configured academic fragment.
#[must_use]
pub fn is_academic_email(email: &str, fragments: &[String]) -> bool {
    if email.is_empty() {
        return false;
    }
    let lowered = email.to_lowercase();
    fragments
        .iter()
        .any(|fragment| lowered.contains(&fragment.to_lowercase()))
}

/// Outcome of evaluating the discount signal for one email/checkbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentSignal {
    /// Whether the student rate applies to the totals.
    pub eligible: bool,
    /// The box was checked against a non-matching email. The explicit
    /// human choice still wins; this only drives the warning surface.
    pub override_warning: bool,
}

/// Evaluate the discount signal.
///
/// A matching email makes the signal eligible on its own (the UI checks
/// the box for the customer). A manually checked box wins even when the
/// email does not match, with the warning raised.
#[must_use]
pub fn evaluate(email: &str, checkbox_checked: bool, fragments: &[String]) -> StudentSignal {
    let email = email.trim();
    let matches = is_academic_email(email, fragments);
    StudentSignal {
        eligible: checkbox_checked || matches,
        override_warning: checkbox_checked && !matches && !email.is_empty(),
    }
}
