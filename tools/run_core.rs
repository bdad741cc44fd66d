// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Boot one plasticity core from configuration and drive it with a
//! deterministic synthetic spike train.
//!
//! Per-crate debug flags (`--debug-spikecore-npu-plasticity`, `--debug-all`)
//! are accepted alongside the regular arguments.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::info;

use spikecore::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, CoreConfig,
};
use spikecore::host::{boot_core, logging_options};
use spikecore::observability::{debug_flags_help, init_logging, parse_debug_flags};
use spikecore::synthetic::{run_spike_train, SpikeTrainParams, TrainReport};

/// Run a spikecore plasticity core on a synthetic spike train
#[derive(Parser, Debug)]
#[command(name = "run_core", version, long_about = None)]
struct Args {
    /// Path to the configuration file (default: SPIKECORE_CONFIG_PATH or ./spikecore.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration override, e.g. `--set timing_rule=dual-fsm` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 1000)]
    ticks: u32,

    /// Pre-synaptic sources (one row each)
    #[arg(long, default_value_t = 16)]
    sources: u32,

    /// Synapses per row
    #[arg(long, default_value_t = 32)]
    synapses_per_row: u32,

    /// Mean pre-synaptic inter-spike interval in ticks
    #[arg(long, default_value_t = 20.0)]
    mean_isi: f64,

    /// Per-tick background firing probability of each post-synaptic neuron
    #[arg(long, default_value_t = 0.01)]
    post_rate: f64,

    /// Probability that a row's target fires shortly after the row arrives
    #[arg(long, default_value_t = 0.3)]
    coupling: f64,

    /// Ticks between a row's arrival and the coupled post-synaptic spike
    #[arg(long, default_value_t = 3)]
    lag: u32,

    /// Print every final weight instead of a per-row summary
    #[arg(long, default_value_t = false)]
    dump_weights: bool,
}

fn parse_overrides(overrides: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for entry in overrides {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("Override '{}' is not KEY=VALUE", entry);
        };
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

fn load(args: &Args, overrides: &HashMap<String, String>) -> Result<CoreConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config_file().ok(),
    };

    match path {
        Some(path) => load_config(Some(&path), Some(overrides))
            .with_context(|| format!("Failed to load {}", path.display())),
        None => {
            let mut config = CoreConfig::default();
            apply_environment_overrides(&mut config)?;
            apply_cli_overrides(&mut config, overrides)?;
            validate_config(&config)?;
            Ok(config)
        }
    }
}

fn print_report(report: &TrainReport, dump_weights: bool) {
    println!("{}", report.stats);
    println!(
        "rows_delivered={} rows_dropped={} rows_rejected={} post_spikes={}",
        report.rows_delivered, report.rows_dropped, report.rows_rejected, report.post_spikes
    );

    for (row, weights) in report.weights().iter().enumerate() {
        if dump_weights {
            println!("row {:>3}: {:?}", row, weights);
            continue;
        }
        let min = weights.iter().copied().min().unwrap_or(0);
        let max = weights.iter().copied().max().unwrap_or(0);
        let mean = if weights.is_empty() {
            0.0
        } else {
            weights.iter().map(|&w| w as f64).sum::<f64>() / weights.len() as f64
        };
        println!("row {:>3}: min={} mean={:.1} max={}", row, min, mean, max);
    }
}

fn main() -> Result<()> {
    let debug_flags = parse_debug_flags();
    let cli_args = env::args().filter(|arg| !arg.starts_with("--debug-"));
    let matches = Args::command()
        .after_help(debug_flags_help())
        .get_matches_from(cli_args);
    let args = Args::from_arg_matches(&matches)?;

    let overrides = parse_overrides(&args.overrides)?;
    let config = load(&args, &overrides)?;
    init_logging(&logging_options(&config), &debug_flags)?;

    let (core, params) = boot_core(&config).context("Core failed to start")?;
    info!(
        "Running {:?} timing with {:?} weights for {} ticks",
        params.timing, params.weight, args.ticks
    );

    let train = SpikeTrainParams {
        ticks: args.ticks,
        sources: args.sources,
        synapses_per_row: args.synapses_per_row,
        mean_isi: args.mean_isi,
        post_rate: args.post_rate,
        coupling: args.coupling,
        lag: args.lag,
    };
    let report = run_spike_train(&core, &config, &train)?;
    print_report(&report, args.dump_weights);

    if core.reentrancy_rejections() > 0 {
        bail!("{} callbacks were rejected as re-entrant", core.reentrancy_rejections());
    }
    Ok(())
}
