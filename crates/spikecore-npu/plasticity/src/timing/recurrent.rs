// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recurrent stochastic timing rules
//!
//! Instead of decaying traces these rules open a window of random length
//! at each spike. A spike on the other side that lands inside the window
//! moves a per-synapse accumulator one step; only when the accumulator
//! reaches its threshold is one unit of plasticity applied.

use alloc::vec::Vec;

use spikecore_npu_neural::{StdpFixed, Tick};
use tracing::warn;

use super::Trace;
use crate::error::{PlasticityError, Result};
use crate::post_events::TraceEvent;
use crate::random::MarsKiss64;
use crate::region::RegionReader;
use crate::synapse_structure::PlasticWordLayout;
use crate::weight::UpdateState;

/// Index bits of a window-length table
pub const WINDOW_TABLE_BITS: u32 = 11;

/// Entries in a window-length table
pub const WINDOW_TABLE_LEN: usize = 1 << WINDOW_TABLE_BITS;

/// Thresholds, window tables and generator shared by both recurrent rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrentParams {
    accumulator_depression_plus_one: i32,
    accumulator_potentiation_minus_one: i32,
    pre_windows: Vec<u16>,
    post_windows: Vec<u16>,
    rng: MarsKiss64,
}

impl RecurrentParams {
    /// Region layout:
    /// `[acc_depression_plus_one][acc_potentiation_minus_one][pre table][post table][seed x4]`
    pub fn from_region(reader: &mut RegionReader<'_>, layout: PlasticWordLayout) -> Result<Self> {
        let accumulator_depression_plus_one = reader.read_i32()?;
        let accumulator_potentiation_minus_one = reader.read_i32()?;

        let (acc_min, acc_max) = layout.accumulator_range();
        if accumulator_depression_plus_one > 0 || accumulator_depression_plus_one <= acc_min {
            return Err(PlasticityError::InvalidRegion {
                block: "recurrent",
                reason: "depression threshold outside accumulator range",
            });
        }
        if accumulator_potentiation_minus_one < 0 || accumulator_potentiation_minus_one >= acc_max {
            return Err(PlasticityError::InvalidRegion {
                block: "recurrent",
                reason: "potentiation threshold outside accumulator range",
            });
        }

        let pre_windows = reader.read_packed_u16(WINDOW_TABLE_LEN, "pre window table")?;
        let post_windows = reader.read_packed_u16(WINDOW_TABLE_LEN, "post window table")?;
        let rng = MarsKiss64::new(reader.read_seed()?);

        let max_window = layout.max_window();
        if max_window > 0
            && pre_windows
                .iter()
                .chain(post_windows.iter())
                .any(|&w| w as u32 > max_window)
        {
            warn!(
                "[PLASTICITY] Window tables hold lengths above {} ticks; they will be clipped",
                max_window
            );
        }

        Ok(Self {
            accumulator_depression_plus_one,
            accumulator_potentiation_minus_one,
            pre_windows,
            post_windows,
            rng,
        })
    }

    pub fn accumulator_depression_plus_one(&self) -> i32 {
        self.accumulator_depression_plus_one
    }

    pub fn accumulator_potentiation_minus_one(&self) -> i32 {
        self.accumulator_potentiation_minus_one
    }

    pub fn rng(&self) -> &MarsKiss64 {
        &self.rng
    }

    #[inline]
    fn draw_pre_window(&mut self) -> u32 {
        self.pre_windows[self.rng.fixed_point_index(WINDOW_TABLE_BITS)] as u32
    }

    #[inline]
    fn draw_post_window(&mut self) -> u32 {
        self.post_windows[self.rng.fixed_point_index(WINDOW_TABLE_BITS)] as u32
    }

    /// One depression step; applies a full unit once the threshold is reached
    fn step_depression(&self, state: &mut UpdateState<'_>) {
        let next = state.accumulator - 1;
        if next > self.accumulator_depression_plus_one {
            state.accumulator = next;
        } else {
            state.accumulator = 0;
            state.apply_depression(StdpFixed::ONE);
        }
    }

    /// One potentiation step; applies a full unit once the threshold is reached
    fn step_potentiation(&self, state: &mut UpdateState<'_>) {
        let next = state.accumulator + 1;
        if next < self.accumulator_potentiation_minus_one {
            state.accumulator = next;
        } else {
            state.accumulator = 0;
            state.apply_potentiation(StdpFixed::ONE);
        }
    }
}

/// Window length as a trace; lengths above the format range saturate
#[inline]
fn window_trace(window: u32) -> Trace {
    StdpFixed::from_int(window.min(i32::MAX as u32) as i32)
}

/// Pre and post spikes each open their own window; the window is the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualFsmRule {
    params: RecurrentParams,
}

impl DualFsmRule {
    pub fn from_region(reader: &mut RegionReader<'_>) -> Result<Self> {
        Ok(Self::new(RecurrentParams::from_region(
            reader,
            PlasticWordLayout::WeightAccumulator,
        )?))
    }

    pub fn new(params: RecurrentParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RecurrentParams {
        &self.params
    }

    pub fn add_pre_spike(&mut self) -> Trace {
        window_trace(self.params.draw_pre_window())
    }

    pub fn add_post_spike(&mut self) -> Trace {
        window_trace(self.params.draw_post_window())
    }

    pub fn apply_pre_spike(&self, time: Tick, last_post: TraceEvent, state: &mut UpdateState<'_>) {
        let elapsed = time.saturating_sub(last_post.time);
        if elapsed > 0 && (elapsed as i64) < last_post.trace.to_int() as i64 {
            self.params.step_depression(state);
        }
    }

    pub fn apply_post_spike(&self, time: Tick, last_pre: TraceEvent, state: &mut UpdateState<'_>) {
        let elapsed = time.saturating_sub(last_pre.time);
        if elapsed > 0 && (elapsed as i64) < last_pre.trace.to_int() as i64 {
            self.params.step_potentiation(state);
        }
    }
}

/// One window per synapse, redrawn from the side of whichever spike came last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreStochasticRule {
    params: RecurrentParams,
}

impl PreStochasticRule {
    pub fn from_region(reader: &mut RegionReader<'_>) -> Result<Self> {
        Ok(Self::new(RecurrentParams::from_region(
            reader,
            PlasticWordLayout::WeightAccumulatorWindow,
        )?))
    }

    pub fn new(params: RecurrentParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RecurrentParams {
        &self.params
    }

    pub fn apply_pre_spike(
        &mut self,
        time: Tick,
        last_post: TraceEvent,
        state: &mut UpdateState<'_>,
    ) {
        let elapsed = time.saturating_sub(last_post.time);
        if elapsed < state.window {
            self.params.step_depression(state);
        }
        state.window = self
            .params
            .draw_pre_window()
            .min(PlasticWordLayout::WeightAccumulatorWindow.max_window());
    }

    pub fn apply_post_spike(
        &mut self,
        time: Tick,
        last_pre: TraceEvent,
        state: &mut UpdateState<'_>,
    ) {
        let elapsed = time.saturating_sub(last_pre.time);
        if elapsed < state.window {
            self.params.step_potentiation(state);
        }
        state.window = self
            .params
            .draw_post_window()
            .min(PlasticWordLayout::WeightAccumulatorWindow.max_window());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::DEFAULT_SEED;
    use crate::region::RegionWriter;
    use crate::synapse_structure::SynapseState;
    use crate::weight::{WeightKind, WeightRegion, WeightRule};

    fn region_words(dep_plus_one: i32, pot_minus_one: i32, pre: u16, post: u16) -> Vec<u32> {
        let mut writer = RegionWriter::new();
        writer
            .push_i32(dep_plus_one)
            .push_i32(pot_minus_one)
            .push_packed_u16(&[pre; WINDOW_TABLE_LEN])
            .push_packed_u16(&[post; WINDOW_TABLE_LEN])
            .push_seed(DEFAULT_SEED);
        writer.into_words()
    }

    fn additive() -> WeightRule {
        WeightRule::from_regions(
            WeightKind::Additive,
            vec![WeightRegion {
                min_weight: 0,
                max_weight: 1000,
                a2_plus: 10,
                a2_minus: 10,
                weight_shift: 0,
                threshold: 0,
            }],
        )
    }

    #[test]
    fn test_region_consumed_exactly() {
        let mut words = region_words(-2, 3, 10, 20);
        words.push(0xABCD);
        let mut reader = RegionReader::new(&words);
        let rule = DualFsmRule::from_region(&mut reader).unwrap();
        assert_eq!(reader.rest(), &[0xABCD]);
        assert_eq!(rule.params().accumulator_depression_plus_one(), -2);
        assert_eq!(rule.params().accumulator_potentiation_minus_one(), 3);
    }

    #[test]
    fn test_thresholds_validated() {
        let words = region_words(1, 3, 10, 20);
        assert!(DualFsmRule::from_region(&mut RegionReader::new(&words)).is_err());

        let words = region_words(-2, 200, 10, 20);
        assert!(PreStochasticRule::from_region(&mut RegionReader::new(&words)).is_err());
    }

    #[test]
    fn test_dual_fsm_windows_are_traces() {
        let words = region_words(-2, 3, 10, 20);
        let mut rule = DualFsmRule::from_region(&mut RegionReader::new(&words)).unwrap();
        assert_eq!(rule.add_pre_spike().to_int(), 10);
        assert_eq!(rule.add_post_spike().to_int(), 20);
    }

    #[test]
    fn test_dual_fsm_potentiation_after_threshold() {
        let words = region_words(-2, 3, 10, 20);
        let rule = DualFsmRule::from_region(&mut RegionReader::new(&words)).unwrap();
        let weights = additive();
        let pre = TraceEvent::new(100, StdpFixed::from_int(10));

        let mut state = weights.initial_state(0, SynapseState::with_weight(500)).unwrap();
        rule.apply_post_spike(105, pre, &mut state);
        assert_eq!(state.accumulator, 1);
        rule.apply_post_spike(106, pre, &mut state);
        assert_eq!(state.accumulator, 2);
        rule.apply_post_spike(107, pre, &mut state);
        assert_eq!(state.accumulator, 0);
        assert_eq!(state.final_state().weight, 510);
    }

    #[test]
    fn test_dual_fsm_ignores_coincident_and_late_spikes() {
        let words = region_words(-2, 3, 10, 20);
        let rule = DualFsmRule::from_region(&mut RegionReader::new(&words)).unwrap();
        let weights = additive();
        let post = TraceEvent::new(50, StdpFixed::from_int(20));

        let mut state = weights.initial_state(0, SynapseState::with_weight(500)).unwrap();
        rule.apply_pre_spike(50, post, &mut state);
        rule.apply_pre_spike(70, post, &mut state);
        assert_eq!(state.accumulator, 0);

        rule.apply_pre_spike(69, post, &mut state);
        assert_eq!(state.accumulator, -1);
        rule.apply_pre_spike(51, post, &mut state);
        assert_eq!(state.accumulator, 0);
        assert_eq!(state.final_state().weight, 490);
    }

    #[test]
    fn test_pre_stochastic_window_redrawn_per_side() {
        let words = region_words(-1, 1, 7, 9);
        let mut rule = PreStochasticRule::from_region(&mut RegionReader::new(&words)).unwrap();
        let weights = additive();
        let mut state = weights.initial_state(0, SynapseState::with_weight(500)).unwrap();

        // First pre: closed window, opens a pre window
        rule.apply_pre_spike(10, TraceEvent::new(0, StdpFixed::ZERO), &mut state);
        assert_eq!(state.window, 7);
        assert_eq!(state.accumulator, 0);

        // Post inside the pre window potentiates (threshold of one step)
        rule.apply_post_spike(16, TraceEvent::new(10, StdpFixed::ZERO), &mut state);
        assert_eq!(state.window, 9);

        // Pre at the same tick as the post counts
        rule.apply_pre_spike(16, TraceEvent::new(16, StdpFixed::ZERO), &mut state);
        assert_eq!(state.window, 7);

        assert_eq!(state.final_state().weight, 500 + 10 - 10);
    }

    #[test]
    fn test_pre_stochastic_window_clipped_to_field() {
        let words = region_words(-1, 1, 1000, 1000);
        let mut rule = PreStochasticRule::from_region(&mut RegionReader::new(&words)).unwrap();
        let weights = additive();
        let mut state = weights.initial_state(0, SynapseState::default()).unwrap();
        rule.apply_pre_spike(1, TraceEvent::new(0, StdpFixed::ZERO), &mut state);
        assert_eq!(state.window, 255);
    }
}
