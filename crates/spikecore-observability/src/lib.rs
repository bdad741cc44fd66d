// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikecore-observability
//!
//! Unified logging for the spikecore host tools.
//!
//! Installs a `tracing-subscriber` `EnvFilter` + `fmt` subscriber (text or
//! JSON) and supports per-crate debug flags (`--debug-spikecore-npu-plasticity`,
//! `SPIKECORE_DEBUG=...`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known spikecore crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikecore",
    "spikecore-config",
    "spikecore-npu-neural",
    "spikecore-npu-plasticity",
    "spikecore-npu-runtime",
    "spikecore-observability",
];

/// Observability errors
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Global log subscriber already installed")]
    AlreadyInitialized,
}
