// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Timing-dependence rules
//!
//! A timing rule owns the trace arithmetic: what a spike writes into its
//! trace (`add_*_spike`) and how much potentiation or depression a spike
//! contributes given the most recent spike on the other side
//! (`apply_*_spike`).
//!
//! ## Coincident pre and post spikes
//!
//! Post events are replayed before the pre spike that triggers the replay,
//! so a post at the same tick as a pre is always seen first. What `dt = 0`
//! then does is variant specific:
//! - **Pair / NearestPair**: counts. A pre at the tick of a post depresses
//!   by the undecayed post trace.
//! - **DualFsm**: ignored on both sides (`dt > 0` required).
//! - **PreStochastic**: counts whenever the synapse window is non-zero.

mod pair;
mod recurrent;

pub use pair::PairRule;
pub use recurrent::{
    DualFsmRule, PreStochasticRule, RecurrentParams, WINDOW_TABLE_BITS, WINDOW_TABLE_LEN,
};

use spikecore_npu_neural::{StdpFixed, Tick};

use crate::error::Result;
use crate::post_events::TraceEvent;
use crate::region::RegionReader;
use crate::synapse_structure::PlasticWordLayout;
use crate::weight::UpdateState;

/// Trace value in the STDP format
///
/// Pair rules store a decaying accumulator. Recurrent rules store a window
/// length as a whole number of ticks.
pub type Trace = StdpFixed;

/// Timing-dependence variant, chosen once at initialisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingKind {
    /// All-to-all spike pairing with accumulating traces
    Pair,
    /// Nearest-neighbour pairing: traces reset at every spike
    NearestPair,
    /// Pre and post windows drawn per spike, accumulator per synapse
    DualFsm,
    /// Single stochastic window stored per synapse
    PreStochastic,
}

/// Configured timing rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingRule {
    Pair(PairRule),
    DualFsm(DualFsmRule),
    PreStochastic(PreStochasticRule),
}

impl TimingRule {
    /// Read the timing section of the region for `kind`
    pub fn initialise(kind: TimingKind, reader: &mut RegionReader<'_>) -> Result<Self> {
        Ok(match kind {
            TimingKind::Pair => TimingRule::Pair(PairRule::from_region(reader, false)?),
            TimingKind::NearestPair => TimingRule::Pair(PairRule::from_region(reader, true)?),
            TimingKind::DualFsm => TimingRule::DualFsm(DualFsmRule::from_region(reader)?),
            TimingKind::PreStochastic => {
                TimingRule::PreStochastic(PreStochasticRule::from_region(reader)?)
            }
        })
    }

    pub fn kind(&self) -> TimingKind {
        match self {
            TimingRule::Pair(rule) if rule.is_nearest() => TimingKind::NearestPair,
            TimingRule::Pair(_) => TimingKind::Pair,
            TimingRule::DualFsm(_) => TimingKind::DualFsm,
            TimingRule::PreStochastic(_) => TimingKind::PreStochastic,
        }
    }

    /// Plastic word layout that carries this rule's per-synapse state
    pub fn plastic_layout(&self) -> PlasticWordLayout {
        match self {
            TimingRule::Pair(_) => PlasticWordLayout::WeightOnly,
            TimingRule::DualFsm(_) => PlasticWordLayout::WeightAccumulator,
            TimingRule::PreStochastic(_) => PlasticWordLayout::WeightAccumulatorWindow,
        }
    }

    /// Trace of the history sentinel
    pub fn initial_post_trace(&self) -> Trace {
        StdpFixed::ZERO
    }

    /// Trace written to the row header by a pre spike at `time`
    pub fn add_pre_spike(&mut self, time: Tick, last_pre: TraceEvent) -> Trace {
        match self {
            TimingRule::Pair(rule) => rule.add_pre_spike(time, last_pre),
            TimingRule::DualFsm(rule) => rule.add_pre_spike(),
            TimingRule::PreStochastic(_) => StdpFixed::ZERO,
        }
    }

    /// Trace recorded in the post history by a post spike at `time`
    pub fn add_post_spike(&mut self, time: Tick, last_post: TraceEvent) -> Trace {
        match self {
            TimingRule::Pair(rule) => rule.add_post_spike(time, last_post),
            TimingRule::DualFsm(rule) => rule.add_post_spike(),
            TimingRule::PreStochastic(_) => StdpFixed::ZERO,
        }
    }

    /// Depression side: a pre spike at `time` against the latest post event
    pub fn apply_pre_spike(
        &mut self,
        time: Tick,
        last_post: TraceEvent,
        state: &mut UpdateState<'_>,
    ) {
        match self {
            TimingRule::Pair(rule) => rule.apply_pre_spike(time, last_post, state),
            TimingRule::DualFsm(rule) => rule.apply_pre_spike(time, last_post, state),
            TimingRule::PreStochastic(rule) => rule.apply_pre_spike(time, last_post, state),
        }
    }

    /// Potentiation side: a post spike at `time` against the previous pre spike
    pub fn apply_post_spike(
        &mut self,
        time: Tick,
        last_pre: TraceEvent,
        state: &mut UpdateState<'_>,
    ) {
        match self {
            TimingRule::Pair(rule) => rule.apply_post_spike(time, last_pre, state),
            TimingRule::DualFsm(rule) => rule.apply_post_spike(time, last_pre, state),
            TimingRule::PreStochastic(rule) => rule.apply_post_spike(time, last_pre, state),
        }
    }
}
