//! Euro display formatting.
//!
//! Display formatting is layered on top of the numeric amounts: stored and
//! transmitted values always keep full decimal precision, only the rendered
//! string drops a trailing `.00`.

use rust_decimal::Decimal;

/// Format an amount for display: `45` for a whole amount, `45.50`
/// otherwise, with a euro suffix.
///
/// Only an exact `.00` fraction is dropped; `45.50` keeps its cents.
#[must_use]
pub fn format_eur(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let display = fixed.strip_suffix(".00").unwrap_or(&fixed);
    format!("{display}\u{20ac}")
}
