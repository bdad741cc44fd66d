// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `spikecore.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoreConfig {
    pub system: SystemConfig,
    pub plasticity: PlasticityConfig,
    /// One record per synapse type, in type order
    pub weights: Vec<WeightConfig>,
    pub synapse_word: SynapseWordConfig,
    pub budget: BudgetConfig,
    pub logging: LoggingConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            plasticity: PlasticityConfig::default(),
            weights: vec![WeightConfig::default(); 2],
            synapse_word: SynapseWordConfig::default(),
            budget: BudgetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Core-level settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    /// Post-synaptic neurons hosted on the core
    pub n_neurons: u32,
    pub debug: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            n_neurons: 256,
            debug: false,
        }
    }
}

/// Spike-timing rule selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingRuleName {
    Pair,
    NearestPair,
    DualFsm,
    PreStochastic,
}

impl TimingRuleName {
    /// Recurrent rules read window tables instead of decay tables
    pub fn is_recurrent(self) -> bool {
        matches!(self, TimingRuleName::DualFsm | TimingRuleName::PreStochastic)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "pair" => Some(Self::Pair),
            "nearest-pair" => Some(Self::NearestPair),
            "dual-fsm" => Some(Self::DualFsm),
            "pre-stochastic" => Some(Self::PreStochastic),
            _ => None,
        }
    }
}

/// Weight-dependence rule selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightRuleName {
    Multiplicative,
    Additive,
    Step,
}

impl WeightRuleName {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "multiplicative" => Some(Self::Multiplicative),
            "additive" => Some(Self::Additive),
            "step" => Some(Self::Step),
            _ => None,
        }
    }
}

/// Timing rule parameters
///
/// Time constants and window means are in ticks. Only the fields of the
/// selected timing rule end up in the region.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasticityConfig {
    pub timing_rule: TimingRuleName,
    pub weight_rule: WeightRuleName,

    // Pair rules
    pub tau_plus: f64,
    pub tau_minus: f64,
    pub tau_plus_table_len: usize,
    pub tau_minus_table_len: usize,
    /// Ticks per table entry, as a power of two
    pub time_shift: u32,

    // Recurrent rules
    pub accumulator_depression_plus_one: i32,
    pub accumulator_potentiation_minus_one: i32,
    pub pre_window_mean: f64,
    pub post_window_mean: f64,
    pub seed: [u32; 4],
}

impl Default for PlasticityConfig {
    fn default() -> Self {
        Self {
            timing_rule: TimingRuleName::Pair,
            weight_rule: WeightRuleName::Multiplicative,
            tau_plus: 16.7,
            tau_minus: 33.7,
            tau_plus_table_len: 256,
            tau_minus_table_len: 256,
            time_shift: 0,
            accumulator_depression_plus_one: -2,
            accumulator_potentiation_minus_one: 2,
            pre_window_mean: 20.0,
            post_window_mean: 20.0,
            seed: [123_456_789, 234_567_891, 345_678_912, 456_789_123],
        }
    }
}

/// Weight bounds and rates for one synapse type
///
/// `a2_plus`/`a2_minus` are in the weight's own fixed-point format, scaled
/// by `weight_shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeightConfig {
    pub min_weight: i32,
    pub max_weight: i32,
    pub a2_plus: i32,
    pub a2_minus: i32,
    pub weight_shift: u32,
    /// Step rule only
    pub threshold: i32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            min_weight: 0,
            max_weight: 8192,
            a2_plus: 410,
            a2_minus: 430,
            weight_shift: 12,
            threshold: 4096,
        }
    }
}

/// Control word field widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseWordConfig {
    pub index_bits: u32,
    pub type_bits: u32,
    pub delay_bits: u32,
}

impl Default for SynapseWordConfig {
    fn default() -> Self {
        Self {
            index_bits: 8,
            type_bits: 1,
            delay_bits: 4,
        }
    }
}

/// Per-row and per-tick processing limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub max_row_synapses: u32,
    pub synapse_updates_per_tick: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_row_synapses: 256,
            synapse_updates_per_tick: 4096,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub ansi: bool,
    /// Crates logged at debug level regardless of `system.log_level`
    pub debug_crates: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            ansi: true,
            debug_crates: Vec::new(),
        }
    }
}
