// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Spikecore Configuration System
//!
//! Type-safe configuration for one plasticity core with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//! - Validation that reports every problem at once
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikecore_config::{load_config, CoreConfig};
//!
//! // Load configuration with automatic file discovery and overrides
//! let config = load_config(None, None).expect("Failed to load config");
//!
//! println!("Timing rule: {:?}", config.plasticity.timing_rule);
//! println!("Synapse types: {}", config.weights.len());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "std")]
pub mod loader;

pub mod types;
pub mod validation;

#[cfg(feature = "std")]
pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, parse_config,
};

pub use types::*;
pub use validation::{collect_errors, validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(feature = "std")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_core_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.weights.len(), 2);
        assert_eq!(config.synapse_word.index_bits, 8);
        assert_eq!(config.synapse_word.type_bits, 1);
        assert_eq!(config.budget.max_row_synapses, 256);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_default_serializes_back() {
        let text = toml::to_string(&CoreConfig::default()).unwrap();
        let parsed = parse_config(&text).unwrap();
        assert_eq!(parsed, CoreConfig::default());
    }
}
