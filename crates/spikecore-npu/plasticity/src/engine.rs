// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Plasticity engine
//!
//! Owns everything a core needs to apply STDP: the timing and weight rules
//! read from the region, one post-event history per neuron, the per-tick
//! synapse budget and the diagnostic counters.
//!
//! Post spikes are only recorded. When a pre spike delivers a row, every
//! synapse replays the post events that happened since the previous pre
//! spike on that row, then applies the new pre spike, then is written back.

use alloc::vec::Vec;

use spikecore_npu_neural::synapse::clamp_weight;
use spikecore_npu_neural::{ControlWordLayout, NeuronId, Tick};
use tracing::{debug, error, info, warn};

use crate::error::{PlasticityError, Result};
use crate::post_events::{PostEventHistory, TraceEvent};
use crate::region::RegionReader;
use crate::row::SynapticRow;
use crate::stats::PlasticityStats;
use crate::synapse_structure::PlasticWordLayout;
use crate::timing::{TimingKind, TimingRule};
use crate::weight::{FinalState, WeightKind, WeightRule};

/// Initialisation parameters that are not part of the region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineParams {
    pub timing: TimingKind,
    pub weight: WeightKind,
    /// Post-synaptic population size
    pub n_neurons: u32,
    /// Weight region records in the region
    pub n_synapse_types: u32,
    pub control_layout: ControlWordLayout,
    /// Rows with more synapses than this are always dropped
    pub max_row_synapses: u32,
    /// Synapse updates allowed per tick across all rows
    pub synapse_updates_per_tick: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            timing: TimingKind::Pair,
            weight: WeightKind::Multiplicative,
            n_neurons: 256,
            n_synapse_types: 2,
            control_layout: ControlWordLayout::DEFAULT,
            max_row_synapses: 256,
            synapse_updates_per_tick: 4096,
        }
    }
}

/// What happened to a delivered row
///
/// Only `Processed` rows were written. `Dropped` and `Rejected` rows are
/// left exactly as delivered and counted in [`PlasticityStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Processed { synapses: u32 },
    /// Larger than `max_row_synapses` or the remaining tick budget
    Dropped { synapses: u32 },
    /// Malformed buffer or a control word naming an unknown neuron or type
    Rejected { error: PlasticityError },
}

/// Event-driven STDP engine for one core
#[derive(Debug, Clone)]
pub struct PlasticityEngine {
    timing: TimingRule,
    weight: WeightRule,
    plastic_layout: PlasticWordLayout,
    control_layout: ControlWordLayout,
    histories: Vec<PostEventHistory>,
    max_row_synapses: u32,
    synapse_updates_per_tick: u32,
    budget_remaining: u32,
    current_tick: Tick,
    stats: PlasticityStats,
}

fn fatal(err: PlasticityError) -> PlasticityError {
    error!("[PLASTICITY] Initialisation failed: {}", err);
    err
}

impl PlasticityEngine {
    /// Build the engine from the plasticity section of `reader`
    ///
    /// Returns the cursor positioned after the consumed words.
    pub fn initialise<'r>(
        reader: RegionReader<'r>,
        params: &EngineParams,
    ) -> Result<(Self, RegionReader<'r>)> {
        let mut reader = reader;
        let start = reader.position();
        validate_params(params).map_err(fatal)?;

        let timing = TimingRule::initialise(params.timing, &mut reader).map_err(fatal)?;
        let weight = WeightRule::initialise(params.weight, params.n_synapse_types, &mut reader)
            .map_err(fatal)?;

        let mut histories = Vec::new();
        histories
            .try_reserve_exact(params.n_neurons as usize)
            .map_err(|_| {
                fatal(PlasticityError::AllocationFailed {
                    what: "post-synaptic histories",
                    elements: params.n_neurons as usize,
                })
            })?;
        let initial_trace = timing.initial_post_trace();
        histories.resize(params.n_neurons as usize, PostEventHistory::new(initial_trace));

        info!(
            "[PLASTICITY] Initialised {:?} timing with {:?} weight dependence: {} neurons, {} synapse types, {} region words",
            params.timing,
            params.weight,
            params.n_neurons,
            params.n_synapse_types,
            reader.position() - start
        );

        let plastic_layout = timing.plastic_layout();
        let engine = Self {
            timing,
            weight,
            plastic_layout,
            control_layout: params.control_layout,
            histories,
            max_row_synapses: params.max_row_synapses,
            synapse_updates_per_tick: params.synapse_updates_per_tick,
            budget_remaining: params.synapse_updates_per_tick,
            current_tick: 0,
            stats: PlasticityStats::default(),
        };
        Ok((engine, reader))
    }

    /// Start a new tick: refill the synapse update budget
    pub fn begin_tick(&mut self, tick: Tick) {
        self.current_tick = tick;
        self.budget_remaining = self.synapse_updates_per_tick;
    }

    /// Apply a pre-synaptic spike at `time` to every synapse of `row`
    ///
    /// Rows larger than `max_row_synapses` or than the remaining tick budget
    /// are left untouched and counted as dropped. Malformed rows and rows
    /// naming an unknown neuron or synapse type are left untouched and
    /// counted as rejected.
    pub fn process_presynaptic_event(&mut self, time: Tick, row: &mut [u32]) -> Result<RowOutcome> {
        let mut row = match SynapticRow::parse(row) {
            Ok(row) => row,
            Err(error) => return Ok(self.reject_row(time, error)),
        };
        let n = row.n_synapses() as u32;

        if n > self.max_row_synapses || n > self.budget_remaining {
            self.stats.rows_dropped += 1;
            debug!(
                "[PLASTICITY] Dropped row of {} synapses at tick {} (limit {}, budget left {})",
                n, self.current_tick, self.max_row_synapses, self.budget_remaining
            );
            return Ok(RowOutcome::Dropped { synapses: n });
        }

        // Reject bad control words before any synapse is rewritten
        if let Err(error) = self.check_controls(row.controls()) {
            return Ok(self.reject_row(time, error));
        }
        self.budget_remaining -= n;

        let last_pre = row.last_pre();
        let new_pre_trace = self.timing.add_pre_spike(time, last_pre);

        for i in 0..row.n_synapses() {
            let fields = self.control_layout.unpack(row.control(i));
            let delay = fields.delay;
            let history = &self.histories[fields.index as usize];

            // Post events as seen at the synapse, after the dendritic delay
            let window = history.window(
                last_pre.time.saturating_sub(delay),
                time.saturating_sub(delay),
            );
            let synapse = self.plastic_layout.unpack(row.plastic(i));
            let mut state = self.weight.initial_state(fields.synapse_type, synapse)?;
            let region = *state.region();

            let mut last_post = delayed(window.previous(), delay);
            for &event in window.events() {
                let post = delayed(event, delay);
                self.timing.apply_post_spike(post.time, last_pre, &mut state);
                last_post = post;
            }
            self.timing.apply_pre_spike(time, last_post, &mut state);

            let mut final_state = state.final_state();
            if !within_bounds(&final_state, region.min_weight, region.max_weight) {
                self.stats.bound_violations += 1;
                warn!(
                    "[PLASTICITY] Weight {} outside [{}, {}] for neuron {} type {}; clamped",
                    final_state.weight,
                    region.min_weight,
                    region.max_weight,
                    fields.index,
                    fields.synapse_type
                );
                final_state.weight =
                    clamp_weight(final_state.weight, region.min_weight, region.max_weight);
            }
            row.set_plastic(i, self.plastic_layout.pack(final_state.to_synapse()));
        }

        row.set_last_pre(time, new_pre_trace);
        self.stats.pre_events += 1;
        self.stats.synapses_updated += n as u64;
        Ok(RowOutcome::Processed { synapses: n })
    }

    fn check_controls(&self, controls: &[u32]) -> Result<()> {
        let n_neurons = self.histories.len() as u32;
        let n_synapse_types = self.weight.n_synapse_types();
        for &control in controls {
            let fields = self.control_layout.unpack(control);
            if fields.index >= n_neurons {
                return Err(PlasticityError::NeuronOutOfRange {
                    neuron: fields.index,
                    n_neurons,
                });
            }
            if fields.synapse_type >= n_synapse_types {
                return Err(PlasticityError::UnknownSynapseType {
                    synapse_type: fields.synapse_type,
                    n_synapse_types,
                });
            }
        }
        Ok(())
    }

    fn reject_row(&mut self, time: Tick, error: PlasticityError) -> RowOutcome {
        self.stats.rows_rejected += 1;
        debug!("[PLASTICITY] Rejected row at tick {}: {}", time, error);
        RowOutcome::Rejected { error }
    }

    /// Record a post-synaptic spike of `neuron` at `time`
    pub fn process_postsynaptic_event(&mut self, time: Tick, neuron: NeuronId) -> Result<()> {
        let n_neurons = self.histories.len() as u32;
        let history = self
            .histories
            .get_mut(neuron.index())
            .ok_or(PlasticityError::NeuronOutOfRange {
                neuron: neuron.0,
                n_neurons,
            })?;

        let trace = self.timing.add_post_spike(time, history.last());
        if history.add(time, trace) {
            self.stats.history_overflows += 1;
            warn!(
                "[PLASTICITY] Post-synaptic history full for {}; oldest event discarded",
                neuron
            );
        }
        self.stats.post_events += 1;
        Ok(())
    }

    pub fn stats(&self) -> PlasticityStats {
        self.stats
    }

    pub fn timing(&self) -> &TimingRule {
        &self.timing
    }

    pub fn weight(&self) -> &WeightRule {
        &self.weight
    }

    pub fn plastic_layout(&self) -> PlasticWordLayout {
        self.plastic_layout
    }

    pub fn control_layout(&self) -> ControlWordLayout {
        self.control_layout
    }

    pub fn history(&self, neuron: NeuronId) -> Option<&PostEventHistory> {
        self.histories.get(neuron.index())
    }

    pub fn n_neurons(&self) -> u32 {
        self.histories.len() as u32
    }

    pub fn budget_remaining(&self) -> u32 {
        self.budget_remaining
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }
}

#[inline]
fn delayed(event: TraceEvent, delay: u32) -> TraceEvent {
    TraceEvent::new(event.time.saturating_add(delay), event.trace)
}

#[inline]
fn within_bounds(state: &FinalState, min: i32, max: i32) -> bool {
    state.weight >= min && state.weight <= max
}

fn validate_params(params: &EngineParams) -> Result<()> {
    let layout = params.control_layout;
    if params.n_neurons == 0 || params.n_neurons > layout.max_neurons() {
        return Err(PlasticityError::InvalidRegion {
            block: "engine",
            reason: "neuron count must be non-zero and addressable by the control word",
        });
    }
    if params.n_synapse_types > layout.max_synapse_types() {
        return Err(PlasticityError::InvalidRegion {
            block: "engine",
            reason: "more synapse types than the control word can address",
        });
    }
    if params.max_row_synapses == 0 {
        return Err(PlasticityError::InvalidRegion {
            block: "engine",
            reason: "max_row_synapses must be non-zero",
        });
    }
    Ok(())
}
