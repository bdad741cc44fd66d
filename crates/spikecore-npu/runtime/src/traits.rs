// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Callback surface a core's event loop drives
//!
//! The platform layer owns the timer interrupt, the spike packet queue and
//! the DMA of synaptic rows; it only needs this trait to hand events to
//! whatever runtime sits on the core.

use spikecore_npu_neural::{NeuronId, Tick};
use spikecore_npu_plasticity::RowOutcome;

use crate::error::Result;

/// Per-core event callbacks
///
/// Implementations must process events strictly in arrival order and run
/// each callback to completion.
pub trait CoreCallbacks {
    /// Timer interrupt for `tick`
    fn on_timer_tick(&self, tick: Tick) -> Result<()>;

    /// A synaptic row arrived for a pre-synaptic spike at `time`
    fn on_spike_received(&self, time: Tick, row: &mut [u32]) -> Result<RowOutcome>;

    /// A local neuron fired at `time`
    fn on_neuron_spiked(&self, time: Tick, neuron: NeuronId) -> Result<()>;
}
