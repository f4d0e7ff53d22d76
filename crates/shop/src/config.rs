//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PERFUME_HOUSE_DATA_DIR` - Directory for persisted cart/wishlist (default: .perfume-house)
//! - `PERFUME_HOUSE_CATALOG` - Product catalog file, YAML or JSON (default: catalog.yaml)
//! - `PERFUME_HOUSE_TAX_RATE` - Tax rate applied at checkout, 0 to 1 (default: 0.18)
//! - `PERFUME_HOUSE_CURRENCY` - Currency the catalog is priced in (default: INR).
//!   Only the display symbol changes; amounts are never converted.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use perfume_house_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::checkout::DEFAULT_TAX_RATE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Directory holding one JSON file per persisted collection
    pub data_dir: PathBuf,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Checkout tax rate
    pub tax_rate: Decimal,
    /// Currency catalog prices are denominated in; selects the display symbol only
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".perfume-house"),
            catalog_path: PathBuf::from("catalog.yaml"),
            tax_rate: DEFAULT_TAX_RATE,
            currency: CurrencyCode::default(),
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("PERFUME_HOUSE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let catalog_path =
            lookup("PERFUME_HOUSE_CATALOG").map_or(defaults.catalog_path, PathBuf::from);

        let tax_rate = match lookup("PERFUME_HOUSE_TAX_RATE") {
            Some(raw) => parse_tax_rate(&raw)?,
            None => defaults.tax_rate,
        };

        let currency = match lookup("PERFUME_HOUSE_CURRENCY") {
            Some(raw) => CurrencyCode::from_str(raw.trim()).map_err(|e| {
                ConfigError::InvalidEnvVar("PERFUME_HOUSE_CURRENCY".to_string(), e)
            })?,
            None => defaults.currency,
        };

        Ok(Self {
            data_dir,
            catalog_path,
            tax_rate,
            currency,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

fn parse_tax_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("PERFUME_HOUSE_TAX_RATE".to_string(), reason)
    };

    let rate = Decimal::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid(format!("must be between 0 and 1 (got {rate})")));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ShopConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".perfume-house"));
        assert_eq!(config.tax_rate, Decimal::new(18, 2));
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("PERFUME_HOUSE_DATA_DIR", "/var/lib/ph"),
            ("PERFUME_HOUSE_CATALOG", "/etc/ph/catalog.json"),
            ("PERFUME_HOUSE_TAX_RATE", "0.05"),
            ("PERFUME_HOUSE_CURRENCY", "usd"),
            ("SENTRY_DSN", ""),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ph"));
        assert_eq!(config.catalog_path, PathBuf::from("/etc/ph/catalog.json"));
        assert_eq!(config.tax_rate, Decimal::new(5, 2));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_tax_rate() {
        for raw in ["eighteen", "1.5", "-0.1"] {
            let result = ShopConfig::from_lookup(lookup(&[("PERFUME_HOUSE_TAX_RATE", raw)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar(ref name, _)) if name == "PERFUME_HOUSE_TAX_RATE"),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_currency() {
        let result = ShopConfig::from_lookup(lookup(&[("PERFUME_HOUSE_CURRENCY", "JPY")]));
        assert!(result.is_err());
    }
}
