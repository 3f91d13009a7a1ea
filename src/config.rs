//! # Engine Configuration
//!
//! Negotiation policy knobs with documented defaults, validated once at the
//! boundary. Nothing downstream re-checks these bounds.
//!
//! Overrides come from `QUOTES__`-prefixed environment variables (a `.env`
//! file is honored), e.g. `QUOTES__DEFAULT_EXPIRY_DAYS=14`.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.default_expiry_days, 7);
//! assert_eq!(config.max_message_len, 1000);
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not be read or parsed.
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    /// A loaded value violates the engine's bounds.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Negotiation policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days until a new quote expires when the customer does not choose.
    pub default_expiry_days: u8,
    /// Smallest accepted `expires_in_days`.
    pub min_expiry_days: u8,
    /// Largest accepted `expires_in_days`.
    pub max_expiry_days: u8,
    /// Minimum requested price as a fraction of the product's effective
    /// price. Requests below the floor are rejected as lowballs.
    pub price_floor_ratio: Decimal,
    /// Maximum length of the specifications text.
    pub max_specifications_len: usize,
    /// Maximum length of any negotiation message.
    pub max_message_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: 7,
            min_expiry_days: 1,
            max_expiry_days: 30,
            price_floor_ratio: Decimal::new(50, 2),
            max_specifications_len: 2000,
            max_message_len: 1000,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the environment, falling back to defaults.
    ///
    /// Reads a `.env` file if present, then applies `QUOTES__`-prefixed
    /// environment overrides, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Source` if the environment values cannot be
    /// parsed, or `ConfigError::Invalid` if a value violates the bounds.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let loaded: Self = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("QUOTES")
                    .prefix_separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validates internal consistency of the bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_expiry_days == 0 {
            return Err(ConfigError::Invalid(
                "min_expiry_days must be at least 1".to_string(),
            ));
        }
        if self.min_expiry_days > self.max_expiry_days {
            return Err(ConfigError::Invalid(format!(
                "min_expiry_days {} exceeds max_expiry_days {}",
                self.min_expiry_days, self.max_expiry_days
            )));
        }
        if self.default_expiry_days < self.min_expiry_days
            || self.default_expiry_days > self.max_expiry_days
        {
            return Err(ConfigError::Invalid(format!(
                "default_expiry_days {} is outside {}..={}",
                self.default_expiry_days, self.min_expiry_days, self.max_expiry_days
            )));
        }
        if self.price_floor_ratio <= Decimal::ZERO || self.price_floor_ratio > Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "price_floor_ratio {} must be within (0, 1]",
                self.price_floor_ratio
            )));
        }
        if self.max_specifications_len == 0 || self.max_message_len == 0 {
            return Err(ConfigError::Invalid(
                "text length bounds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.default_expiry_days, 7);
        assert_eq!(config.min_expiry_days, 1);
        assert_eq!(config.max_expiry_days, 30);
        assert_eq!(config.price_floor_ratio, Decimal::new(50, 2));
        assert_eq!(config.max_specifications_len, 2000);
        assert_eq!(config.max_message_len, 1000);
    }

    #[test]
    fn defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn default_outside_bounds_rejected() {
        let config = EngineConfig {
            default_expiry_days: 45,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = EngineConfig {
            min_expiry_days: 10,
            max_expiry_days: 5,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn floor_ratio_must_be_a_fraction() {
        let config = EngineConfig {
            price_floor_ratio: Decimal::new(15, 1), // 1.5
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EngineConfig {
            price_floor_ratio: Decimal::ZERO,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_min_expiry_rejected() {
        let config = EngineConfig {
            min_expiry_days: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
