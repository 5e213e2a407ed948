//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Format a decimal amount as euros, dropping a trailing `.00`.
///
/// Usage in templates: `{{ cart.totals.total|eur }}`
#[askama::filter_fn]
pub fn eur(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let value = amount.to_string().parse::<Decimal>().unwrap_or_default();
    Ok(elysian_core::format_eur(value))
}

/// Format a shipping amount: waived shipping renders as "Free".
///
/// Usage in templates: `{{ cart.totals.shipping|shipping_label }}`
#[askama::filter_fn]
pub fn shipping_label(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let value = amount.to_string().parse::<Decimal>().unwrap_or_default();
    if value.is_zero() {
        Ok("Free".to_string())
    } else {
        Ok(elysian_core::format_eur(value))
    }
}
