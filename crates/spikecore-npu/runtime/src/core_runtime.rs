// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-core runtime owning the plasticity engine
//!
//! Callbacks run to completion on one core. The engine sits behind a
//! non-blocking [`spin::Mutex`]: a callback that finds it held (an interrupt
//! delivered inside another callback) is rejected and counted, never spun on.

use core::sync::atomic::{AtomicU32, Ordering};

use spikecore_npu_neural::{NeuronId, Tick};
use spikecore_npu_plasticity::{
    EngineParams, PlasticityEngine, PlasticityStats, RegionReader, RowOutcome,
};
use spin::Mutex;
use tracing::{error, info, warn};

use crate::error::{Result, RuntimeError};
use crate::traits::CoreCallbacks;

/// One core's plasticity runtime
pub struct CoreRuntime {
    engine: Mutex<PlasticityEngine>,
    reentrancy_rejections: AtomicU32,
}

impl CoreRuntime {
    /// Build the engine from the plasticity section at the start of `region`
    ///
    /// Returns the runtime and the number of words consumed, so the caller
    /// can hand the rest of the region to the next sub-module.
    pub fn initialise(region: &[u32], params: &EngineParams) -> Result<(Self, usize)> {
        let (engine, rest) = PlasticityEngine::initialise(RegionReader::new(region), params)
            .map_err(|err| {
                error!("[RUNTIME] Core refused to start: {}", err);
                RuntimeError::Initialisation(err)
            })?;
        let consumed = rest.position();
        info!(
            "[RUNTIME] Core ready: {} of {} region words consumed by plasticity",
            consumed,
            region.len()
        );

        Ok((
            Self {
                engine: Mutex::new(engine),
                reentrancy_rejections: AtomicU32::new(0),
            },
            consumed,
        ))
    }

    /// Run `f` with exclusive access to the engine
    ///
    /// Fails with [`RuntimeError::Reentrant`] if the engine is already held.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut PlasticityEngine) -> R) -> Result<R> {
        self.with_engine_for("engine access", f)
    }

    fn with_engine_for<R>(
        &self,
        callback: &'static str,
        f: impl FnOnce(&mut PlasticityEngine) -> R,
    ) -> Result<R> {
        match self.engine.try_lock() {
            Some(mut engine) => Ok(f(&mut engine)),
            None => {
                let rejected = self.reentrancy_rejections.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    "[RUNTIME] Rejected re-entrant {} ({} rejections so far)",
                    callback, rejected
                );
                Err(RuntimeError::Reentrant { callback })
            }
        }
    }

    /// Snapshot of the engine counters
    pub fn stats(&self) -> Result<PlasticityStats> {
        self.with_engine_for("stats read", |engine| engine.stats())
    }

    /// Callbacks rejected because the engine was busy
    pub fn reentrancy_rejections(&self) -> u32 {
        self.reentrancy_rejections.load(Ordering::Relaxed)
    }

    /// Consume the runtime and hand back the engine
    pub fn into_engine(self) -> PlasticityEngine {
        self.engine.into_inner()
    }
}

impl CoreCallbacks for CoreRuntime {
    fn on_timer_tick(&self, tick: Tick) -> Result<()> {
        self.with_engine_for("timer tick", |engine| engine.begin_tick(tick))
    }

    fn on_spike_received(&self, time: Tick, row: &mut [u32]) -> Result<RowOutcome> {
        let outcome =
            self.with_engine_for("spike delivery", |engine| engine.process_presynaptic_event(time, row))?;
        Ok(outcome?)
    }

    fn on_neuron_spiked(&self, time: Tick, neuron: NeuronId) -> Result<()> {
        let recorded =
            self.with_engine_for("neuron spike", |engine| engine.process_postsynaptic_event(time, neuron))?;
        Ok(recorded?)
    }
}
