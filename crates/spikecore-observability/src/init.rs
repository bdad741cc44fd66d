// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for spikecore host tools

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};
use crate::ObservabilityError;

/// Build the filter: base level plus one debug directive per flagged crate
pub fn build_filter(
    level: &str,
    debug_flags: &CrateDebugFlags,
) -> std::result::Result<EnvFilter, ObservabilityError> {
    let base = level
        .parse::<LevelFilter>()
        .map_err(|e| ObservabilityError::InvalidFilter {
            filter: level.to_string(),
            reason: e.to_string(),
        })?;
    let mut directives = vec![base.to_string().to_ascii_lowercase()];
    directives.extend(debug_flags.directives());
    let filter = directives.join(",");

    EnvFilter::try_new(&filter).map_err(|e| ObservabilityError::InvalidFilter {
        filter,
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if the level does not parse or a subscriber is already installed.
pub fn init_logging(options: &LoggingOptions, debug_flags: &CrateDebugFlags) -> Result<()> {
    let filter = build_filter(&options.level, debug_flags).context("Failed to build log filter")?;

    let installed = match options.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(options.ansi)
            .with_target(options.with_target)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(options.with_target)
            .try_init(),
    };
    installed.map_err(|_| ObservabilityError::AlreadyInitialized)?;

    if debug_flags.any_enabled() {
        tracing::debug!(
            "Debug logging enabled for: {}",
            debug_flags.enabled_crates().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

/// Initialize logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging(&LoggingOptions::default(), debug_flags)
}
