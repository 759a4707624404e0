//! Configuration for the form machine.

use crate::form::error::ConfigError;
use crate::form::section::Validator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Settings for [`FormMachine`](crate::form::FormMachine).
///
/// Missing fields fall back to their defaults when loading from JSON.
///
/// # Example
///
/// ```rust
/// use modeflow::form::FormConfig;
///
/// let config = FormConfig::from_json(r#"{ "submit_delay_ms": 500 }"#).unwrap();
/// assert_eq!(config.submit_delay_ms, 500);
/// assert_eq!(config.user_info_pattern, "^[a-zA-Z]+$");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Delay between a submit and the `Submitted` follow-up event.
    pub submit_delay_ms: u64,
    /// Pattern a user-info entry must match to count as valid.
    pub user_info_pattern: String,
    /// Pattern a payment-details entry must match to count as valid.
    pub payment_details_pattern: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            user_info_pattern: "^[a-zA-Z]+$".to_string(),
            payment_details_pattern: "^[0-9]{16}$".to_string(),
        }
    }
}

impl FormConfig {
    /// Parse a configuration from JSON and check that both patterns compile.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.user_info_validator()?;
        config.payment_details_validator()?;
        Ok(config)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn user_info_validator(&self) -> Result<Validator, ConfigError> {
        pattern_validator("user_info_pattern", &self.user_info_pattern)
    }

    pub fn payment_details_validator(&self) -> Result<Validator, ConfigError> {
        pattern_validator("payment_details_pattern", &self.payment_details_pattern)
    }
}

/// Validator accepting text that matches `pattern`.
pub fn pattern_validator(field: &'static str, pattern: &str) -> Result<Validator, ConfigError> {
    let regex =
        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { field, source })?;
    Ok(Arc::new(move |text: &str| regex.is_match(text)))
}
