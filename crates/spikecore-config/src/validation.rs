// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every check runs; all failures are reported together so a broken config
//! file can be fixed in one pass.

use crate::{ConfigError, ConfigResult, CoreConfig};

/// Largest decay table the core accepts
pub const MAX_TABLE_LEN: usize = 4096;

/// Widest control word field set
pub const CONTROL_WORD_BITS: u32 = 32;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, reason: String },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, reason } => {
                write!(f, "{} is out of range: {}", field, reason)
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &CoreConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Run every check and return the failures
pub fn collect_errors(config: &CoreConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_system(config, &mut errors);
    validate_timing(config, &mut errors);
    validate_weights(config, &mut errors);
    validate_synapse_word(config, &mut errors);
    validate_budget(config, &mut errors);
    errors
}

fn out_of_range(errors: &mut Vec<ConfigValidationError>, field: impl Into<String>, reason: impl Into<String>) {
    errors.push(ConfigValidationError::OutOfRange {
        field: field.into(),
        reason: reason.into(),
    });
}

fn validate_system(config: &CoreConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.system.n_neurons == 0 {
        out_of_range(errors, "system.n_neurons", "must be at least 1");
    }
    let max_neurons = 1u64 << config.synapse_word.index_bits.min(32);
    if config.system.n_neurons as u64 > max_neurons {
        out_of_range(
            errors,
            "system.n_neurons",
            format!("{} neurons cannot be addressed with {} index bits", config.system.n_neurons, config.synapse_word.index_bits),
        );
    }
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&config.system.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "system.log_level".to_string(),
            reason: format!("'{}' is not one of {:?}", config.system.log_level, LEVELS),
        });
    }
}

fn validate_timing(config: &CoreConfig, errors: &mut Vec<ConfigValidationError>) {
    let p = &config.plasticity;

    if p.timing_rule.is_recurrent() {
        if p.accumulator_depression_plus_one > 0 || p.accumulator_depression_plus_one <= i8::MIN as i32 {
            out_of_range(
                errors,
                "plasticity.accumulator_depression_plus_one",
                format!("{} not in ({}, 0]", p.accumulator_depression_plus_one, i8::MIN),
            );
        }
        if p.accumulator_potentiation_minus_one < 0 || p.accumulator_potentiation_minus_one >= i8::MAX as i32 {
            out_of_range(
                errors,
                "plasticity.accumulator_potentiation_minus_one",
                format!("{} not in [0, {})", p.accumulator_potentiation_minus_one, i8::MAX),
            );
        }
        for (field, mean) in [
            ("plasticity.pre_window_mean", p.pre_window_mean),
            ("plasticity.post_window_mean", p.post_window_mean),
        ] {
            if !(mean.is_finite() && mean > 0.0) {
                out_of_range(errors, field, "must be a positive number of ticks");
            }
        }
        if p.seed[1] == 0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: "plasticity.seed".to_string(),
                reason: "the second seed word drives the xorshift lane and must be non-zero".to_string(),
            });
        }
    } else {
        for (field, tau) in [("plasticity.tau_plus", p.tau_plus), ("plasticity.tau_minus", p.tau_minus)] {
            if !(tau.is_finite() && tau > 0.0) {
                out_of_range(errors, field, "must be a positive number of ticks");
            }
        }
        for (field, len) in [
            ("plasticity.tau_plus_table_len", p.tau_plus_table_len),
            ("plasticity.tau_minus_table_len", p.tau_minus_table_len),
        ] {
            if len == 0 || len > MAX_TABLE_LEN {
                out_of_range(errors, field, format!("{} not in 1..={}", len, MAX_TABLE_LEN));
            }
        }
        if p.time_shift >= 32 {
            out_of_range(errors, "plasticity.time_shift", format!("{} must be below 32", p.time_shift));
        }
    }
}

fn validate_weights(config: &CoreConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.weights.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "weights".to_string(),
        });
        return;
    }

    let max_types = 1usize << config.synapse_word.type_bits.min(16);
    if config.weights.len() > max_types {
        out_of_range(
            errors,
            "weights",
            format!(
                "{} synapse types cannot be addressed with {} type bits",
                config.weights.len(),
                config.synapse_word.type_bits
            ),
        );
    }

    for (i, w) in config.weights.iter().enumerate() {
        let field = |name: &str| format!("weights[{}].{}", i, name);
        if w.min_weight < 0 || w.min_weight > u16::MAX as i32 {
            out_of_range(errors, field("min_weight"), format!("{} not in 0..=65535", w.min_weight));
        }
        if w.max_weight < w.min_weight || w.max_weight > u16::MAX as i32 {
            out_of_range(
                errors,
                field("max_weight"),
                format!("{} not in {}..=65535", w.max_weight, w.min_weight),
            );
        }
        if w.weight_shift >= 32 {
            out_of_range(errors, field("weight_shift"), format!("{} must be below 32", w.weight_shift));
        }
    }
}

fn validate_synapse_word(config: &CoreConfig, errors: &mut Vec<ConfigValidationError>) {
    let word = &config.synapse_word;
    if word.index_bits == 0 {
        out_of_range(errors, "synapse_word.index_bits", "must be at least 1");
    }
    let total = word.index_bits.saturating_add(word.type_bits).saturating_add(word.delay_bits);
    if total > CONTROL_WORD_BITS {
        out_of_range(
            errors,
            "synapse_word",
            format!("{} bits do not fit a {}-bit control word", total, CONTROL_WORD_BITS),
        );
    }
}

fn validate_budget(config: &CoreConfig, errors: &mut Vec<ConfigValidationError>) {
    let budget = &config.budget;
    if budget.max_row_synapses == 0 {
        out_of_range(errors, "budget.max_row_synapses", "must be at least 1");
    }
    if budget.synapse_updates_per_tick < budget.max_row_synapses {
        out_of_range(
            errors,
            "budget.synapse_updates_per_tick",
            format!(
                "{} is below max_row_synapses ({}); full rows would always be dropped",
                budget.synapse_updates_per_tick, budget.max_row_synapses
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CoreConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = CoreConfig::default();
        config.plasticity.tau_plus = 0.0;
        config.plasticity.tau_minus_table_len = 5000;
        config.weights[1].max_weight = 70_000;
        config.budget.max_row_synapses = 0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 4, "{:?}", errors);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("plasticity.tau_plus"));
        assert!(message.contains("weights[1].max_weight"));
    }

    #[test]
    fn test_recurrent_thresholds_checked() {
        let mut config = CoreConfig::default();
        config.plasticity.timing_rule = TimingRuleName::PreStochastic;
        config.plasticity.accumulator_depression_plus_one = 1;
        config.plasticity.accumulator_potentiation_minus_one = 200;
        // Pair-only fields are not checked for recurrent rules
        config.plasticity.tau_plus = -1.0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 2, "{:?}", errors);
    }

    #[test]
    fn test_zero_xorshift_seed_rejected() {
        let mut config = CoreConfig::default();
        config.plasticity.timing_rule = TimingRuleName::DualFsm;
        config.plasticity.seed = [1, 0, 3, 4];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_control_word_capacity() {
        let mut config = CoreConfig::default();
        config.synapse_word.index_bits = 4;
        config.synapse_word.type_bits = 0;
        config.synapse_word.delay_bits = 30;

        let errors = collect_errors(&config);
        // 256 neurons over 4 index bits, 2 types over 0 type bits, 34 bits total
        assert_eq!(errors.len(), 3, "{:?}", errors);
    }

    #[test]
    fn test_missing_weights() {
        let mut config = CoreConfig::default();
        config.weights.clear();
        assert_eq!(
            collect_errors(&config),
            vec![ConfigValidationError::MissingRequired {
                field: "weights".to_string()
            }]
        );
    }
}
