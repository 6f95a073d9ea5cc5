//! Configuration parsing and management.

use envoy_types::{Resolver, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Settings shared by the offer registry and the value store
///
/// ```yaml
/// max_depth: 64
/// log_resolution: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvoyConfig {
    /// Maximum chain of producer hops during payload resolution
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Emit a trace event for every offer resolved by `solicit`
    #[serde(default)]
    pub log_resolution: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for EnvoyConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            log_resolution: false,
        }
    }
}

impl EnvoyConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EnvoyConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Build the resolver described by this configuration
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EnvoyConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.log_resolution);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = EnvoyConfig::from_yaml_str("log_resolution: true\n").unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.log_resolution);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = EnvoyConfig::from_yaml_str("max_depth: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_depth",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = EnvoyConfig::from_yaml_str("max_depth: [not, a, number]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth: 8").unwrap();

        let config = EnvoyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.resolver().max_depth(), 8);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvoyConfig::from_file(dir.path().join("envoy.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
