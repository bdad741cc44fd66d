// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike-pair timing rule (all-to-all and nearest-neighbour)

use spikecore_npu_neural::{StdpFixed, Tick};

use super::Trace;
use crate::decay::DecayLookupTable;
use crate::error::Result;
use crate::post_events::TraceEvent;
use crate::region::RegionReader;
use crate::weight::UpdateState;

/// Exponential pair rule with separate potentiation and depression time constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRule {
    tau_plus: DecayLookupTable,
    tau_minus: DecayLookupTable,
    nearest: bool,
}

impl PairRule {
    /// Region layout: `[tau_plus table][tau_minus table]`
    pub fn from_region(reader: &mut RegionReader<'_>, nearest: bool) -> Result<Self> {
        let tau_plus = DecayLookupTable::from_region(reader, "tau_plus")?;
        let tau_minus = DecayLookupTable::from_region(reader, "tau_minus")?;
        Ok(Self::new(tau_plus, tau_minus, nearest))
    }

    pub fn new(tau_plus: DecayLookupTable, tau_minus: DecayLookupTable, nearest: bool) -> Self {
        Self {
            tau_plus,
            tau_minus,
            nearest,
        }
    }

    #[inline]
    pub fn is_nearest(&self) -> bool {
        self.nearest
    }

    pub fn tau_plus(&self) -> &DecayLookupTable {
        &self.tau_plus
    }

    pub fn tau_minus(&self) -> &DecayLookupTable {
        &self.tau_minus
    }

    pub fn add_pre_spike(&self, time: Tick, last_pre: TraceEvent) -> Trace {
        if self.nearest {
            return StdpFixed::ONE;
        }
        self.tau_plus
            .decay(last_pre.trace, time.saturating_sub(last_pre.time))
            .saturating_add(StdpFixed::ONE)
    }

    pub fn add_post_spike(&self, time: Tick, last_post: TraceEvent) -> Trace {
        if self.nearest {
            return StdpFixed::ONE;
        }
        self.tau_minus
            .decay(last_post.trace, time.saturating_sub(last_post.time))
            .saturating_add(StdpFixed::ONE)
    }

    /// Pre trace decayed to a post spike at `time`
    #[inline]
    pub fn potentiation(&self, time: Tick, last_pre: TraceEvent) -> StdpFixed {
        self.tau_plus
            .decay(last_pre.trace, time.saturating_sub(last_pre.time))
    }

    /// Post trace decayed to a pre spike at `time`
    #[inline]
    pub fn depression(&self, time: Tick, last_post: TraceEvent) -> StdpFixed {
        self.tau_minus
            .decay(last_post.trace, time.saturating_sub(last_post.time))
    }

    pub fn apply_pre_spike(&self, time: Tick, last_post: TraceEvent, state: &mut UpdateState<'_>) {
        let amount = self.depression(time, last_post);
        if amount > StdpFixed::ZERO {
            state.apply_depression(amount);
        }
    }

    pub fn apply_post_spike(&self, time: Tick, last_pre: TraceEvent, state: &mut UpdateState<'_>) {
        let amount = self.potentiation(time, last_pre);
        if amount > StdpFixed::ZERO {
            state.apply_potentiation(amount);
        }
    }
}
