// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side core preparation
//!
//! Turns a [`CoreConfig`] into the engine parameters and the binary region a
//! core is booted from. Tables are computed here, in floating point, and
//! only ever read on the core.

use spikecore_config::{CoreConfig, LogFormat as ConfigLogFormat, TimingRuleName, WeightRuleName};
use spikecore_npu_neural::{ControlWordLayout, NeuralError};
use spikecore_npu_plasticity::timing::WINDOW_TABLE_LEN;
use spikecore_npu_plasticity::{EngineParams, PlasticityError, RegionWriter, TimingKind, WeightKind, WeightRegion};
use spikecore_npu_runtime::{CoreRuntime, RuntimeError};
use spikecore_observability::{LogFormat, LoggingOptions};
use tracing::info;

/// Failures preparing or booting a core from configuration
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Invalid control word layout: {0}")]
    ControlWord(#[from] NeuralError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("Spike train generation failed: {0}")]
    Generator(#[from] PlasticityError),

    #[error("Region has {unused} trailing words after the plasticity section")]
    TrailingWords { unused: usize },
}

pub fn timing_kind(name: TimingRuleName) -> TimingKind {
    match name {
        TimingRuleName::Pair => TimingKind::Pair,
        TimingRuleName::NearestPair => TimingKind::NearestPair,
        TimingRuleName::DualFsm => TimingKind::DualFsm,
        TimingRuleName::PreStochastic => TimingKind::PreStochastic,
    }
}

pub fn weight_kind(name: WeightRuleName) -> WeightKind {
    match name {
        WeightRuleName::Multiplicative => WeightKind::Multiplicative,
        WeightRuleName::Additive => WeightKind::Additive,
        WeightRuleName::Step => WeightKind::Step,
    }
}

/// Engine parameters for a configured core
pub fn engine_params(config: &CoreConfig) -> Result<EngineParams, HostError> {
    let word = &config.synapse_word;
    let control_layout = ControlWordLayout::new(word.index_bits, word.type_bits, word.delay_bits)?;

    Ok(EngineParams {
        timing: timing_kind(config.plasticity.timing_rule),
        weight: weight_kind(config.plasticity.weight_rule),
        n_neurons: config.system.n_neurons,
        n_synapse_types: config.weights.len() as u32,
        control_layout,
        max_row_synapses: config.budget.max_row_synapses,
        synapse_updates_per_tick: config.budget.synapse_updates_per_tick,
    })
}

/// Build the plasticity region: timing section, then one weight record per type
pub fn build_region(config: &CoreConfig) -> Vec<u32> {
    let p = &config.plasticity;
    let mut writer = RegionWriter::new();

    if p.timing_rule.is_recurrent() {
        writer
            .push_i32(p.accumulator_depression_plus_one)
            .push_i32(p.accumulator_potentiation_minus_one)
            .push_exp_dist_table(p.pre_window_mean, WINDOW_TABLE_LEN)
            .push_exp_dist_table(p.post_window_mean, WINDOW_TABLE_LEN)
            .push_seed(p.seed);
    } else {
        writer
            .push_exp_decay_table(p.tau_plus, p.tau_plus_table_len, p.time_shift)
            .push_exp_decay_table(p.tau_minus, p.tau_minus_table_len, p.time_shift);
    }

    for w in &config.weights {
        let record = WeightRegion {
            min_weight: w.min_weight,
            max_weight: w.max_weight,
            a2_plus: w.a2_plus,
            a2_minus: w.a2_minus,
            weight_shift: w.weight_shift,
            threshold: w.threshold,
        };
        for word in record.to_words() {
            writer.push_u32(word);
        }
    }

    writer.into_words()
}

/// Build the region and start a core from it
///
/// The whole region must be consumed; leftover words mean the region and
/// the parameters disagree about the section layout.
pub fn boot_core(config: &CoreConfig) -> Result<(CoreRuntime, EngineParams), HostError> {
    let params = engine_params(config)?;
    let region = build_region(config);
    let (core, consumed) = CoreRuntime::initialise(&region, &params)?;
    if consumed != region.len() {
        return Err(HostError::TrailingWords {
            unused: region.len() - consumed,
        });
    }
    info!(
        "Booted core: {:?}/{:?}, {} region words",
        params.timing,
        params.weight,
        region.len()
    );
    Ok((core, params))
}

/// Logging options from the `system` and `logging` sections
pub fn logging_options(config: &CoreConfig) -> LoggingOptions {
    LoggingOptions {
        level: config.system.log_level.clone(),
        format: match config.logging.format {
            ConfigLogFormat::Text => LogFormat::Text,
            ConfigLogFormat::Json => LogFormat::Json,
        },
        ansi: config.logging.ansi,
        with_target: config.system.debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikecore_npu_plasticity::RegionReader;

    #[test]
    fn test_region_round_trips_through_engine() {
        for timing in [
            TimingRuleName::Pair,
            TimingRuleName::NearestPair,
            TimingRuleName::DualFsm,
            TimingRuleName::PreStochastic,
        ] {
            let mut config = CoreConfig::default();
            config.plasticity.timing_rule = timing;
            let (core, params) = boot_core(&config).unwrap();
            assert_eq!(params.timing, timing_kind(timing));
            assert_eq!(core.stats().unwrap().pre_events, 0);
        }
    }

    #[test]
    fn test_weight_records_in_type_order() {
        let mut config = CoreConfig::default();
        config.weights[1].max_weight = 1234;
        let params = engine_params(&config).unwrap();
        let region = build_region(&config);

        let (engine, rest) =
            spikecore_npu_plasticity::PlasticityEngine::initialise(RegionReader::new(&region), &params)
                .unwrap();
        assert_eq!(rest.remaining(), 0);
        assert_eq!(engine.weight().region(1).unwrap().max_weight, 1234);
        assert_eq!(engine.weight().region(0).unwrap().max_weight, 8192);
    }

    #[test]
    fn test_bad_control_layout_rejected() {
        let mut config = CoreConfig::default();
        config.synapse_word.index_bits = 30;
        config.synapse_word.delay_bits = 8;
        assert!(matches!(engine_params(&config), Err(HostError::ControlWord(_))));
    }

    #[test]
    fn test_logging_options_follow_config() {
        let mut config = CoreConfig::default();
        config.logging.format = ConfigLogFormat::Json;
        config.system.log_level = "debug".to_string();
        let options = logging_options(&config);
        assert_eq!(options.format, LogFormat::Json);
        assert_eq!(options.level, "debug");
    }
}
