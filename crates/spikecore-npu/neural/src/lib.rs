// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spikecore Neural Types (Platform-Agnostic)
//!
//! The numeric and layout vocabulary shared by every core-side crate:
//! - **Types**: fixed-point formats, neuron identifiers, ticks, errors
//! - **Synapse**: control word layout and raw weight helpers
//!
//! ## Target Platforms
//! - Desktop hosts (tests, offline tools)
//! - Embedded cores without floating point or an allocator

#![cfg_attr(not(feature = "std"), no_std)]

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Synaptic word layouts
pub mod synapse;

// Re-export types
pub use types::{
    decay, mul_shift, Accum, DecayMultiplier, Error, Fixed, NeuralError, NeuronId, Result,
    StdpFixed, Tick, UFixed, WeightFixed, ACCUM_FRACTIONAL_BITS, DECAY_FIXED_POINT,
    DECAY_IDENTITY, STDP_FIXED_POINT, STDP_FIXED_POINT_ONE,
};

// Re-export synapse module
pub use synapse::{ControlFields, ControlWordLayout};
