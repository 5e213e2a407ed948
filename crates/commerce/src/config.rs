//! Commerce configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; every one has a shipping-ready default, and
//! in particular a missing publishable key degrades checkout to the demo
//! path rather than failing startup.
//!
//! - `CART_STORAGE_KEY` - Storage key the cart persists under (default: cart)
//! - `FLAT_SHIPPING_FEE` - Flat fee below the free-shipping threshold (default: 4)
//! - `FREE_SHIPPING_THRESHOLD` - Shipping waived strictly above this subtotal (default: 100)
//! - `STUDENT_DISCOUNT_RATE` - Subtotal rate deducted for students (default: 0.10)
//! - `ACADEMIC_DOMAINS` - Comma-separated academic-domain fragments (default: built-in list)
//! - `STORAGE_SETTLE_MS` - Debounce window before reconciling external cart writes (default: 80)
//! - `FALLBACK_DELAY_MS` - Simulated-payment delay on the demo path (default: 900)
//! - `CHECKOUT_ENDPOINT` - Session-creation endpoint URL
//!   (default: `http://localhost:3000/create-payment-intent`)
//! - `STRIPE_PUBLISHABLE_KEY` - Publishable key for the payment provider;
//!   absent means no provider is configured

use std::time::Duration;

use elysian_core::PricingPolicy;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::checkout::discount::DEFAULT_ACADEMIC_FRAGMENTS;

const DEFAULT_STORAGE_KEY: &str = "cart";
const DEFAULT_FLAT_SHIPPING_FEE: &str = "4";
const DEFAULT_FREE_SHIPPING_THRESHOLD: &str = "100";
const DEFAULT_STUDENT_DISCOUNT_RATE: &str = "0.10";
const DEFAULT_STORAGE_SETTLE_MS: &str = "80";
const DEFAULT_FALLBACK_DELAY_MS: &str = "900";
const DEFAULT_CHECKOUT_ENDPOINT: &str = "http://localhost:3000/create-payment-intent";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Commerce core configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Storage key the persisted cart lives under.
    pub storage_key: String,
    /// Shipping fee, threshold, and student rate.
    pub pricing: PricingPolicy,
    /// Academic-domain fragments for the discount heuristic.
    pub academic_fragments: Vec<String>,
    /// Tolerated staleness window before reconciling a cart write observed
    /// from another tab.
    pub external_settle: Duration,
    /// Delay on the simulated-success path, preserving the perceived
    /// submit-then-confirm rhythm.
    pub fallback_delay: Duration,
    /// Session-creation endpoint of the payment backend.
    pub checkout_endpoint: Url,
    /// Publishable provider credential. `None` is the supported degraded
    /// mode, not an error.
    pub stripe_publishable_key: Option<String>,
}

impl CommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only when a variable is present but
    /// unparsable; absent variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let pricing = PricingPolicy {
            flat_shipping_fee: parse_decimal("FLAT_SHIPPING_FEE", DEFAULT_FLAT_SHIPPING_FEE)?,
            free_shipping_threshold: parse_decimal(
                "FREE_SHIPPING_THRESHOLD",
                DEFAULT_FREE_SHIPPING_THRESHOLD,
            )?,
            student_discount_rate: parse_decimal(
                "STUDENT_DISCOUNT_RATE",
                DEFAULT_STUDENT_DISCOUNT_RATE,
            )?,
        };

        Ok(Self {
            storage_key: get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            pricing,
            academic_fragments: academic_fragments_from(get_optional_env("ACADEMIC_DOMAINS")),
            external_settle: Duration::from_millis(parse_millis(
                "STORAGE_SETTLE_MS",
                DEFAULT_STORAGE_SETTLE_MS,
            )?),
            fallback_delay: Duration::from_millis(parse_millis(
                "FALLBACK_DELAY_MS",
                DEFAULT_FALLBACK_DELAY_MS,
            )?),
            checkout_endpoint: parse_url("CHECKOUT_ENDPOINT", DEFAULT_CHECKOUT_ENDPOINT)?,
            stripe_publishable_key: get_optional_env("STRIPE_PUBLISHABLE_KEY"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_decimal(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    parse_decimal_value(key, &get_env_or_default(key, default))
}

fn parse_decimal_value(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_millis(key: &str, default: &str) -> Result<u64, ConfigError> {
    parse_millis_value(key, &get_env_or_default(key, default))
}

fn parse_millis_value(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_url_value(key, &get_env_or_default(key, default))
}

fn parse_url_value(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split a comma-separated fragment list, falling back to the built-in
/// list when unset or effectively empty.
fn academic_fragments_from(raw: Option<String>) -> Vec<String> {
    let fragments: Vec<String> = raw
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if fragments.is_empty() {
        DEFAULT_ACADEMIC_FRAGMENTS
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        fragments
    }
}
