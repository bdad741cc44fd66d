// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Spikecore Core Runtime
//!
//! Hosts one [`PlasticityEngine`](spikecore_npu_plasticity::PlasticityEngine)
//! per core and exposes it through the core's event callbacks.
//!
//! ## Features
//!
//! - `default` = `[]` (no_std compatible)
//! - `std` = `std::error::Error` impls and host fixtures in the dependencies
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spikecore_npu_runtime::{CoreCallbacks, CoreRuntime};
//!
//! let (core, consumed) = CoreRuntime::initialise(&region, &params)?;
//! core.on_timer_tick(1)?;
//! core.on_spike_received(1, &mut row)?;
//! core.on_neuron_spiked(2, NeuronId(3))?;
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![warn(missing_docs)]

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod core_runtime;
pub mod error;
pub mod traits;

pub use core_runtime::CoreRuntime;
pub use error::{Result, RuntimeError};
pub use traits::CoreCallbacks;
