// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic word module
//!
//! Bit layouts of the fixed (control) half of a synapse and the raw weight
//! helpers used when rewriting the plastic half.

pub mod weight;
pub mod word;

pub use weight::*;
pub use word::*;
