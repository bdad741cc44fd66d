// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plastic synaptic row view
//!
//! Row layout in `u32` words:
//!
//! ```text
//! [last_pre_time][last_pre_trace][n][n plastic words][n control words]
//! ```

use alloc::vec::Vec;

use spikecore_npu_neural::{StdpFixed, Tick};

use crate::error::{PlasticityError, Result};
use crate::post_events::TraceEvent;
use crate::timing::Trace;

/// Header words before the plastic region
pub const ROW_HEADER_WORDS: usize = 3;

/// Mutable view over one delivered row
#[derive(Debug)]
pub struct SynapticRow<'r> {
    words: &'r mut [u32],
    n_synapses: usize,
}

impl<'r> SynapticRow<'r> {
    /// Check the buffer against the synapse count in its header
    pub fn parse(words: &'r mut [u32]) -> Result<Self> {
        if words.len() < ROW_HEADER_WORDS {
            return Err(PlasticityError::RowMalformed {
                words: words.len(),
                synapses: 0,
            });
        }
        let n = words[2];
        let needed = (n as usize)
            .checked_mul(2)
            .and_then(|w| w.checked_add(ROW_HEADER_WORDS));
        match needed {
            Some(needed) if needed <= words.len() => Ok(Self {
                words,
                n_synapses: n as usize,
            }),
            _ => Err(PlasticityError::RowMalformed {
                words: words.len(),
                synapses: n,
            }),
        }
    }

    #[inline]
    pub fn n_synapses(&self) -> usize {
        self.n_synapses
    }

    #[inline]
    pub fn last_pre(&self) -> TraceEvent {
        TraceEvent::new(self.words[0], StdpFixed::from_bits(self.words[1] as i32))
    }

    #[inline]
    pub fn set_last_pre(&mut self, time: Tick, trace: Trace) {
        self.words[0] = time;
        self.words[1] = trace.to_bits() as u32;
    }

    #[inline]
    pub fn plastic(&self, index: usize) -> u32 {
        self.words[ROW_HEADER_WORDS + index]
    }

    #[inline]
    pub fn set_plastic(&mut self, index: usize, word: u32) {
        self.words[ROW_HEADER_WORDS + index] = word;
    }

    #[inline]
    pub fn control(&self, index: usize) -> u32 {
        self.words[ROW_HEADER_WORDS + self.n_synapses + index]
    }

    pub fn controls(&self) -> &[u32] {
        let start = ROW_HEADER_WORDS + self.n_synapses;
        &self.words[start..start + self.n_synapses]
    }
}

/// Build a row buffer from `(plastic, control)` word pairs
pub fn build_row(last_pre: TraceEvent, synapses: &[(u32, u32)]) -> Vec<u32> {
    let mut words = Vec::with_capacity(ROW_HEADER_WORDS + 2 * synapses.len());
    words.push(last_pre.time);
    words.push(last_pre.trace.to_bits() as u32);
    words.push(synapses.len() as u32);
    words.extend(synapses.iter().map(|&(plastic, _)| plastic));
    words.extend(synapses.iter().map(|&(_, control)| control));
    words
}
