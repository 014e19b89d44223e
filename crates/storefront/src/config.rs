//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MOUNTRUSH_STATE_PATH` - JSON file holding persisted shop state
//!   (default: `.mountrush/state.json`)
//! - `MOUNTRUSH_CATALOG` - Product file path or http(s) URL (default: `products.json`)
//! - `MOUNTRUSH_TAX_PERCENT` - Tax rate in percent (default: 5)
//! - `MOUNTRUSH_SHIPPING` - Flat shipping charge (default: 49)
//! - `MOUNTRUSH_ANALYTICS_URL` - Endpoint for analytics beacons (default: none, log only)

use std::path::PathBuf;
use std::str::FromStr;

use mountrush_core::Price;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::cart::PricingPolicy;
use crate::cart::pricing::{DEFAULT_SHIPPING, DEFAULT_TAX_PERCENT};

const DEFAULT_STATE_PATH: &str = ".mountrush/state.json";
const DEFAULT_CATALOG: &str = "products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// File backing the key-value store
    pub state_path: PathBuf,
    /// Where the second catalog tier reads products from
    pub catalog_location: String,
    /// Tax rate and shipping charge
    pub pricing: PricingPolicy,
    /// Analytics beacon endpoint
    pub analytics_url: Option<Url>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            catalog_location: DEFAULT_CATALOG.to_string(),
            pricing: PricingPolicy::default(),
            analytics_url: None,
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let state_path = get("MOUNTRUSH_STATE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);
        let catalog_location =
            get("MOUNTRUSH_CATALOG").unwrap_or_else(|| DEFAULT_CATALOG.to_string());

        let tax_percent = match get("MOUNTRUSH_TAX_PERCENT") {
            Some(raw) => parse_non_negative_decimal("MOUNTRUSH_TAX_PERCENT", &raw)?,
            None => Decimal::from(DEFAULT_TAX_PERCENT),
        };
        let base_shipping = match get("MOUNTRUSH_SHIPPING") {
            Some(raw) => Price::new(parse_var("MOUNTRUSH_SHIPPING", &raw)?),
            None => DEFAULT_SHIPPING,
        };
        let analytics_url = get("MOUNTRUSH_ANALYTICS_URL")
            .map(|raw| parse_var::<Url>("MOUNTRUSH_ANALYTICS_URL", &raw))
            .transpose()?;

        Ok(Self {
            state_path,
            catalog_location,
            pricing: PricingPolicy {
                tax_percent,
                base_shipping,
            },
            analytics_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable in the error.
fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a decimal that must not be negative.
fn parse_non_negative_decimal(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    let value: Decimal = parse_var(key, raw)?;
    if value.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(value)
}
