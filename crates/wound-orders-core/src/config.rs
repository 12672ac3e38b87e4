//! Order intake configuration.
//!
//! Resolved once by the host and passed into [`crate::intake::OrderService`]
//! at construction. Nothing on the validation path reads process-wide
//! environment state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How to treat a catalog variant whose size descriptor cannot be parsed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// Reject the order with `variant_size_unparseable`
    #[default]
    Strict,
    /// Log a warning and count the item as 0 cm²
    Lenient,
}

/// Order intake settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderConfig {
    /// Ordered area may be at most this multiple of the wound area
    pub area_allowance_multiplier: Decimal,
    pub size_policy: SizePolicy,
    /// Prefix of generated order numbers
    pub order_number_prefix: String,
    /// Orders shown in a patient's history unless all are requested
    pub history_page_size: usize,
    /// Extra invoice recipients (admins, fulfilment inbox)
    pub admin_recipients: Vec<String>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            area_allowance_multiplier: Decimal::new(12, 1),
            size_policy: SizePolicy::Strict,
            order_number_prefix: "PH".into(),
            history_page_size: 5,
            admin_recipients: Vec::new(),
        }
    }
}

impl OrderConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: OrderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.area_allowance_multiplier < Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "area_allowance_multiplier must be at least 1, got {}",
                self.area_allowance_multiplier
            )));
        }
        if self.order_number_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "order_number_prefix cannot be empty".into(),
            ));
        }
        if self.history_page_size == 0 {
            return Err(ConfigError::Invalid(
                "history_page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Builder-style override of the size policy.
    pub fn with_size_policy(mut self, size_policy: SizePolicy) -> Self {
        self.size_policy = size_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrderConfig::default();
        assert_eq!(config.area_allowance_multiplier, Decimal::new(12, 1));
        assert_eq!(config.size_policy, SizePolicy::Strict);
        assert_eq!(config.order_number_prefix, "PH");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = OrderConfig::from_json(
            r#"{"size_policy": "lenient", "admin_recipients": ["ops@example.com"]}"#,
        )
        .unwrap();
        assert_eq!(config.size_policy, SizePolicy::Lenient);
        assert_eq!(config.admin_recipients, vec!["ops@example.com".to_string()]);
        assert_eq!(config.history_page_size, 5);
    }

    #[test]
    fn test_multiplier_from_string_or_number() {
        let from_str = OrderConfig::from_json(r#"{"area_allowance_multiplier": "1.5"}"#).unwrap();
        assert_eq!(from_str.area_allowance_multiplier, Decimal::new(15, 1));

        let from_num = OrderConfig::from_json(r#"{"area_allowance_multiplier": 1.25}"#).unwrap();
        assert_eq!(from_num.area_allowance_multiplier, Decimal::new(125, 2));
    }

    #[test]
    fn test_validation_failures() {
        assert!(OrderConfig::from_json(r#"{"area_allowance_multiplier": "0.9"}"#).is_err());
        assert!(OrderConfig::from_json(r#"{"order_number_prefix": "  "}"#).is_err());
        assert!(OrderConfig::from_json(r#"{"history_page_size": 0}"#).is_err());
        assert!(OrderConfig::from_json(r#"{"size_policy": "yolo"}"#).is_err());
    }
}
