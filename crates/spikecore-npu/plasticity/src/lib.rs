// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spikecore Plasticity Module
//!
//! Event-driven, fixed-point STDP for a single neuromorphic core:
//! - Decay lookup tables replacing runtime `exp()`
//! - Pair, nearest-pair and recurrent stochastic timing rules
//! - Multiplicative, additive and step weight dependence
//! - Deferred replay of post-synaptic events at the next pre-synaptic spike
//!
//! ## Architecture
//! - `no_std` + `alloc`; all storage is reserved during initialisation
//! - No floating point on the event path
//! - Region data is read through an explicit, bounds-checked cursor

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod decay;
pub mod engine;
pub mod error;
pub mod param_generator;
pub mod post_events;
pub mod random;
pub mod region;
pub mod row;
pub mod stats;
pub mod synapse_structure;
pub mod timing;
pub mod weight;

// Re-export key types
pub use decay::DecayLookupTable;
pub use engine::{EngineParams, PlasticityEngine, RowOutcome};
pub use error::{PlasticityError, Result};
pub use param_generator::{ExponentialClipped, MAX_REDRAWS};
pub use post_events::{PostEventHistory, TraceEvent, MAX_POST_SYNAPTIC_EVENTS};
pub use random::MarsKiss64;
pub use region::RegionReader;
#[cfg(feature = "std")]
pub use region::RegionWriter;
pub use row::{build_row, SynapticRow};
pub use stats::PlasticityStats;
pub use synapse_structure::{PlasticWordLayout, SynapseState};
pub use timing::{TimingKind, TimingRule, Trace};
pub use weight::{FinalState, UpdateState, WeightKind, WeightRegion, WeightRule};
