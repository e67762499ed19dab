use crate::headlight::HeadlightThresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Tunables fixed once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub headlight: HeadlightThresholds,
    pub welcome_enabled: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            headlight: HeadlightThresholds::default(),
            welcome_enabled: true,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let h = &self.headlight;
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);

        if !in_unit(h.low_threshold) || !in_unit(h.high_threshold) {
            return Err(ConfigError::Invalid("Knob thresholds must lie in [0, 1]"));
        }
        if h.low_threshold >= h.high_threshold {
            return Err(ConfigError::Invalid(
                "Knob low threshold must be below high threshold",
            ));
        }
        if !in_unit(h.dusk_threshold) {
            return Err(ConfigError::Invalid("Dusk threshold must lie in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            ControllerConfig::from_json_str(r#"{ "headlight": { "dusk_threshold": 0.25 } }"#)
                .unwrap();
        assert_eq!(config.headlight.dusk_threshold, 0.25);
        assert_eq!(config.headlight.low_threshold, 0.3);
        assert!(config.welcome_enabled);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = ControllerConfig::from_json_str(
            r#"{ "headlight": { "low_threshold": 0.8, "high_threshold": 0.2 } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_dusk_rejected() {
        let result = ControllerConfig::from_json_str(r#"{ "headlight": { "dusk_threshold": 1.5 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = ControllerConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
