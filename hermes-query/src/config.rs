//! Execution configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Knobs of the boolean execution engine
///
/// Every field has a default, so a partial JSON document such as
/// `{"bulk_window_size": 4096}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Number of doc ids scored per window by the bulk disjunction scorer
    pub bulk_window_size: usize,
    /// Min-should-match disjunctions (m > 1) are scored in bulk only when their
    /// cost reaches `max_doc / msm_bulk_cost_divisor`
    pub msm_bulk_cost_divisor: u64,
    /// Maximum number of clauses in a single boolean query
    pub max_clause_count: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            bulk_window_size: 2048,
            msm_bulk_cost_divisor: 3,
            max_clause_count: 1024,
        }
    }
}

impl ExecutionConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bulk_window_size == 0 {
            return Err(Error::Config("bulk_window_size must be > 0".to_string()));
        }
        if self.msm_bulk_cost_divisor == 0 {
            return Err(Error::Config("msm_bulk_cost_divisor must be > 0".to_string()));
        }
        if self.max_clause_count == 0 {
            return Err(Error::Config("max_clause_count must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ExecutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bulk_window_size, 2048);
        assert_eq!(config.msm_bulk_cost_divisor, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ExecutionConfig::from_json(r#"{"bulk_window_size": 64}"#).unwrap();
        assert_eq!(config.bulk_window_size, 64);
        assert_eq!(config.max_clause_count, 1024);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ExecutionConfig::from_json(r#"{"bulk_window_size": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ExecutionConfig::from_json(r#"{"msm_bulk_cost_divisor": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ExecutionConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigJson(_)));
    }

    #[test]
    fn test_roundtrip_json() {
        let config = ExecutionConfig {
            bulk_window_size: 128,
            msm_bulk_cost_divisor: 5,
            max_clause_count: 16,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ExecutionConfig::from_json(&json).unwrap(), config);
    }
}
