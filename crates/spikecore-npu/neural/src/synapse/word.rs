// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Control word layout
//!
//! A control word is the immutable half of a synapse, packed low to high as
//! `[index | type | delay]`: the postsynaptic neuron index in the lowest
//! bits, the synapse type above it, and the dendritic delay at the top.
//! `index | type` taken together address the neuron's per-type input.

use crate::types::{NeuralError, Result};

/// Field widths of a control word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWordLayout {
    index_bits: u32,
    type_bits: u32,
    delay_bits: u32,
}

/// Decoded fields of a control word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFields {
    /// Postsynaptic neuron index
    pub index: u32,
    /// Synapse type (receptor) index
    pub synapse_type: u32,
    /// Dendritic delay in ticks
    pub delay: u32,
}

#[inline(always)]
const fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

impl ControlWordLayout {
    /// 8 index bits, 1 type bit, 4 delay bits
    pub const DEFAULT: Self = Self {
        index_bits: 8,
        type_bits: 1,
        delay_bits: 4,
    };

    pub const fn new(index_bits: u32, type_bits: u32, delay_bits: u32) -> Result<Self> {
        if index_bits == 0 || index_bits.saturating_add(type_bits).saturating_add(delay_bits) > 32 {
            return Err(NeuralError::InvalidLayout {
                index_bits,
                type_bits,
                delay_bits,
            });
        }
        Ok(Self {
            index_bits,
            type_bits,
            delay_bits,
        })
    }

    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    #[inline(always)]
    pub const fn type_bits(&self) -> u32 {
        self.type_bits
    }

    #[inline(always)]
    pub const fn delay_bits(&self) -> u32 {
        self.delay_bits
    }

    /// Number of distinct postsynaptic neurons addressable by this layout
    #[inline(always)]
    pub const fn max_neurons(&self) -> u32 {
        mask(self.index_bits).saturating_add(1)
    }

    /// Number of synapse types addressable by this layout
    #[inline(always)]
    pub const fn max_synapse_types(&self) -> u32 {
        mask(self.type_bits).saturating_add(1)
    }

    #[inline(always)]
    pub const fn max_delay(&self) -> u32 {
        mask(self.delay_bits)
    }

    /// Pack fields into a control word, rejecting values wider than their field
    pub fn pack(&self, fields: ControlFields) -> Result<u32> {
        check_field("index", fields.index, self.index_bits)?;
        check_field("synapse_type", fields.synapse_type, self.type_bits)?;
        check_field("delay", fields.delay, self.delay_bits)?;

        let type_shift = self.index_bits;
        let delay_shift = self.index_bits + self.type_bits;
        Ok(fields.index
            | (fields.synapse_type.checked_shl(type_shift).unwrap_or(0))
            | (fields.delay.checked_shl(delay_shift).unwrap_or(0)))
    }

    #[inline]
    pub const fn unpack(&self, word: u32) -> ControlFields {
        ControlFields {
            index: self.index(word),
            synapse_type: self.synapse_type(word),
            delay: self.delay(word),
        }
    }

    #[inline(always)]
    pub const fn index(&self, word: u32) -> u32 {
        word & mask(self.index_bits)
    }

    #[inline(always)]
    pub const fn synapse_type(&self, word: u32) -> u32 {
        if self.index_bits >= 32 {
            0
        } else {
            (word >> self.index_bits) & mask(self.type_bits)
        }
    }

    #[inline(always)]
    pub const fn delay(&self, word: u32) -> u32 {
        let shift = self.index_bits + self.type_bits;
        if shift >= 32 {
            0
        } else {
            (word >> shift) & mask(self.delay_bits)
        }
    }
}

impl Default for ControlWordLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_field(field: &'static str, value: u32, bits: u32) -> Result<()> {
    if value > mask(bits) {
        return Err(NeuralError::FieldOverflow { field, value, bits });
    }
    Ok(())
}
