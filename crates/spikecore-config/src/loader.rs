// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base values; missing keys take defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)
//!
//! The merged result is validated before it is returned.

use crate::types::{LogFormat, TimingRuleName, WeightRuleName};
use crate::{validate_config, ConfigError, ConfigResult, CoreConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "spikecore.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SPIKECORE_CONFIG_PATH";

/// Find the spikecore configuration file
///
/// Search order:
/// 1. `SPIKECORE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikecore.toml`
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let cwd = env::current_dir()?;
    let path = cwd.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Ok(path);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in {}. Set {} to specify a custom location.",
        CONFIG_FILE_NAME,
        cwd.display(),
        CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, an
/// override cannot be parsed, or the result fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CoreConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config = parse_config(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Parse a TOML document without applying overrides or validation
pub fn parse_config(content: &str) -> ConfigResult<CoreConfig> {
    Ok(toml::from_str(content)?)
}

/// Environment variable -> override key
const ENV_OVERRIDES: [(&str, &str); 10] = [
    ("SPIKECORE_LOG_LEVEL", "log_level"),
    ("SPIKECORE_LOG_FORMAT", "log_format"),
    ("SPIKECORE_N_NEURONS", "n_neurons"),
    ("SPIKECORE_TIMING_RULE", "timing_rule"),
    ("SPIKECORE_WEIGHT_RULE", "weight_rule"),
    ("SPIKECORE_TAU_PLUS", "tau_plus"),
    ("SPIKECORE_TAU_MINUS", "tau_minus"),
    ("SPIKECORE_SEED", "seed"),
    ("SPIKECORE_MAX_ROW_SYNAPSES", "max_row_synapses"),
    ("SPIKECORE_SYNAPSE_UPDATES_PER_TICK", "synapse_updates_per_tick"),
];

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKECORE_LOG_LEVEL` -> `system.log_level`
/// - `SPIKECORE_LOG_FORMAT` -> `logging.format` (`text` or `json`)
/// - `SPIKECORE_N_NEURONS` -> `system.n_neurons`
/// - `SPIKECORE_TIMING_RULE` -> `plasticity.timing_rule`
/// - `SPIKECORE_WEIGHT_RULE` -> `plasticity.weight_rule`
/// - `SPIKECORE_TAU_PLUS` / `SPIKECORE_TAU_MINUS` -> `plasticity.tau_plus` / `tau_minus`
/// - `SPIKECORE_SEED` -> `plasticity.seed` (four comma-separated words)
/// - `SPIKECORE_MAX_ROW_SYNAPSES` -> `budget.max_row_synapses`
/// - `SPIKECORE_SYNAPSE_UPDATES_PER_TICK` -> `budget.synapse_updates_per_tick`
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` naming the variable that did not parse
pub fn apply_environment_overrides(config: &mut CoreConfig) -> ConfigResult<()> {
    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            apply_override(config, key, &value)
                .map_err(|reason| ConfigError::InvalidValue(format!("{}={}: {}", var, value, reason)))?;
        }
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// Keys are the override names used by the environment table, e.g.
/// `{"seed": "1,2,3,4", "max_row_synapses": "64"}`. Unknown keys are an error.
pub fn apply_cli_overrides(config: &mut CoreConfig, cli_args: &HashMap<String, String>) -> ConfigResult<()> {
    for (key, value) in cli_args {
        apply_override(config, key, value)
            .map_err(|reason| ConfigError::InvalidValue(format!("--{} {}: {}", key, value, reason)))?;
    }
    Ok(())
}

fn apply_override(config: &mut CoreConfig, key: &str, value: &str) -> Result<(), String> {
    match key {
        "log_level" => config.system.log_level = value.to_string(),
        "log_format" => {
            config.logging.format = match value.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err("expected 'text' or 'json'".to_string()),
            }
        }
        "n_neurons" => config.system.n_neurons = parse(value)?,
        "timing_rule" => {
            config.plasticity.timing_rule =
                TimingRuleName::parse(value).ok_or_else(|| "unknown timing rule".to_string())?
        }
        "weight_rule" => {
            config.plasticity.weight_rule =
                WeightRuleName::parse(value).ok_or_else(|| "unknown weight rule".to_string())?
        }
        "tau_plus" => config.plasticity.tau_plus = parse(value)?,
        "tau_minus" => config.plasticity.tau_minus = parse(value)?,
        "seed" => config.plasticity.seed = parse_seed(value)?,
        "max_row_synapses" => config.budget.max_row_synapses = parse(value)?,
        "synapse_updates_per_tick" => config.budget.synapse_updates_per_tick = parse(value)?,
        _ => return Err("unknown override".to_string()),
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| e.to_string())
}

fn parse_seed(value: &str) -> Result<[u32; 4], String> {
    let words = value
        .split(',')
        .map(parse::<u32>)
        .collect::<Result<Vec<_>, _>>()?;
    <[u32; 4]>::try_from(words).map_err(|words| format!("expected 4 seed words, got {}", words.len()))
}
