// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikecore - event-driven STDP for neuromorphic cores
//!
//! Spike-timing-dependent plasticity that runs on a single core with no
//! floating point and no runtime `exp()`: decay curves arrive as lookup
//! tables in the core's region, post-synaptic spikes are buffered and
//! replayed when the next pre-synaptic row is delivered, and every weight
//! update is fixed-point and saturating.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! spikecore = "0.1"  # Default: std + host tools
//! ```
//!
//! ## Feature Flags
//!
//! - **`platform-std`** (default): std builds of every crate plus host tools
//! - **`platform-no-std`**: on-core build (`no_std` + `alloc`)
//! - **`host-tools`**: configuration loading, logging and region building
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikecore::host::boot_core;
//! use spikecore::prelude::*;
//!
//! let config = spikecore::config::load_config(None, None)?;
//! let (core, _params) = boot_core(&config)?;
//!
//! core.on_timer_tick(1)?;
//! core.on_neuron_spiked(1, NeuronId(3))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikecore-npu-neural                       │
//! │  (fixed-point formats, ids, synaptic word layouts)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: spikecore-npu-plasticity                   │
//! │  (decay tables, timing and weight rules, row updates)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Runtime: spikecore-npu-runtime                         │
//! │  (per-core callbacks, re-entrancy guard)                │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Host: spikecore-config, spikecore-observability        │
//! │  (TOML config, logging, region building)                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

#![cfg_attr(not(any(feature = "platform-std", feature = "host-tools")), no_std)]

// Re-export core crates
pub use spikecore_npu_neural as neural;
pub use spikecore_npu_plasticity as plasticity;
pub use spikecore_npu_runtime as runtime;

// Re-export host infrastructure
#[cfg(feature = "host-tools")]
pub use spikecore_config as config;

#[cfg(feature = "host-tools")]
pub use spikecore_observability as observability;

#[cfg(feature = "host-tools")]
pub mod host;

#[cfg(feature = "host-tools")]
pub mod synthetic;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{ControlFields, ControlWordLayout, NeuronId, StdpFixed, Tick};
    pub use crate::plasticity::{
        EngineParams, PlasticityEngine, PlasticityError, PlasticityStats, RegionReader,
        RowOutcome, TimingKind, WeightKind,
    };
    pub use crate::runtime::{CoreCallbacks, CoreRuntime, RuntimeError};

    #[cfg(feature = "host-tools")]
    pub use crate::config::CoreConfig;
}
