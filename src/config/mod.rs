//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `MERCHANT`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use merchant_core::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Grace period: {} days", config.billing.grace_period_days);
//! ```

mod error;

pub use error::{ConfigError, ConfigValidationError};

use serde::Deserialize;

use crate::domain::subscription::{GracePolicy, DEFAULT_GRACE_PERIOD_DAYS};

/// Root engine configuration
///
/// Every field has a default, so an empty environment yields a working
/// configuration with the stock policy values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Billing policy knobs
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Billing policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days a failed payment may linger in `PastDue` before expiring
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: i64,

    /// Maximum subscriptions one renewal sweep processes per batch
    #[serde(default = "default_renewal_batch_size")]
    pub renewal_batch_size: u32,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `MERCHANT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MERCHANT__BILLING__GRACE_PERIOD_DAYS=5` -> `billing.grace_period_days = 5`
    /// - `MERCHANT__BILLING__RENEWAL_BATCH_SIZE=50` -> `billing.renewal_batch_size = 50`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MERCHANT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.billing.validate()
    }
}

impl BillingConfig {
    /// Builds the grace policy these settings describe.
    pub fn grace_policy(&self) -> GracePolicy {
        GracePolicy::new(self.grace_period_days)
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0..=365).contains(&self.grace_period_days) {
            return Err(ConfigValidationError::InvalidGracePeriod);
        }
        if self.renewal_batch_size == 0 {
            return Err(ConfigValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            grace_period_days: default_grace_period_days(),
            renewal_batch_size: default_renewal_batch_size(),
        }
    }
}

fn default_grace_period_days() -> i64 {
    DEFAULT_GRACE_PERIOD_DAYS
}

fn default_renewal_batch_size() -> u32 {
    100
}
