// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-core plasticity counters for post-run diagnostics

use core::fmt;

/// Plasticity counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlasticityStats {
    /// Pre-synaptic rows processed
    pub pre_events: u64,
    /// Post-synaptic spikes recorded
    pub post_events: u64,
    /// Synapses rewritten
    pub synapses_updated: u64,
    /// Rows dropped (too large or over the tick budget)
    pub rows_dropped: u64,
    /// Rows rejected as malformed or naming an unknown neuron or synapse type
    pub rows_rejected: u64,
    /// Final weights found outside their bounds and clamped
    pub bound_violations: u64,
    /// Post events discarded from full histories
    pub history_overflows: u64,
}

impl fmt::Display for PlasticityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pre_events={} post_events={} synapses_updated={} rows_dropped={} rows_rejected={} bound_violations={} history_overflows={}",
            self.pre_events,
            self.post_events,
            self.synapses_updated,
            self.rows_dropped,
            self.rows_rejected,
            self.bound_violations,
            self.history_overflows
        )
    }
}
