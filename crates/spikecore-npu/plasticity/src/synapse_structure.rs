// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plastic synapse word layouts
//!
//! The plastic half of a synapse always carries a 16-bit weight in its low
//! half. Recurrent timing rules keep auxiliary state in the high half.

/// Bit layout of a plastic synapse word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlasticWordLayout {
    /// `weight:16`
    WeightOnly,
    /// `weight:16 | accumulator:i16`
    WeightAccumulator,
    /// `weight:16 | accumulator:i8 | window:u8`
    WeightAccumulatorWindow,
}

/// Decoded plastic word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SynapseState {
    pub weight: u16,
    pub accumulator: i32,
    pub window: u32,
}

impl SynapseState {
    pub const fn with_weight(weight: u16) -> Self {
        Self {
            weight,
            accumulator: 0,
            window: 0,
        }
    }
}

impl PlasticWordLayout {
    /// Accumulator range representable in this layout
    pub const fn accumulator_range(self) -> (i32, i32) {
        match self {
            PlasticWordLayout::WeightOnly => (0, 0),
            PlasticWordLayout::WeightAccumulator => (i16::MIN as i32, i16::MAX as i32),
            PlasticWordLayout::WeightAccumulatorWindow => (i8::MIN as i32, i8::MAX as i32),
        }
    }

    /// Largest window length representable in this layout
    pub const fn max_window(self) -> u32 {
        match self {
            PlasticWordLayout::WeightAccumulatorWindow => u8::MAX as u32,
            _ => 0,
        }
    }

    #[inline]
    pub fn unpack(self, word: u32) -> SynapseState {
        let weight = word as u16;
        match self {
            PlasticWordLayout::WeightOnly => SynapseState::with_weight(weight),
            PlasticWordLayout::WeightAccumulator => SynapseState {
                weight,
                accumulator: (word >> 16) as u16 as i16 as i32,
                window: 0,
            },
            PlasticWordLayout::WeightAccumulatorWindow => SynapseState {
                weight,
                accumulator: (word >> 16) as u8 as i8 as i32,
                window: (word >> 24) & 0xFF,
            },
        }
    }

    /// Pack a state, saturating auxiliary fields to their widths
    #[inline]
    pub fn pack(self, state: SynapseState) -> u32 {
        let weight = state.weight as u32;
        let (acc_min, acc_max) = self.accumulator_range();
        let accumulator = state.accumulator.clamp(acc_min, acc_max);
        match self {
            PlasticWordLayout::WeightOnly => weight,
            PlasticWordLayout::WeightAccumulator => weight | ((accumulator as i16 as u16 as u32) << 16),
            PlasticWordLayout::WeightAccumulatorWindow => {
                let window = state.window.min(self.max_window());
                weight | ((accumulator as i8 as u8 as u32) << 16) | (window << 24)
            }
        }
    }
}
