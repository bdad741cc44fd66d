// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Types Module
//!
//! Core type definitions shared by the plasticity engine and runtime.

pub mod error;
pub mod fixed;
pub mod ids;

// Re-export commonly used types
pub use error::{Error, NeuralError, Result};
pub use fixed::{
    decay, mul_shift, Accum, DecayMultiplier, Fixed, StdpFixed, UFixed, WeightFixed,
    ACCUM_FRACTIONAL_BITS, DECAY_FIXED_POINT, DECAY_IDENTITY, STDP_FIXED_POINT,
    STDP_FIXED_POINT_ONE,
};
pub use ids::{NeuronId, Tick};
