// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Exponential decay lookup tables
//!
//! Traces never decay in the background. When a spike needs a trace, the
//! elapsed time since the trace was last written indexes a host-computed
//! table of `exp(-dt / tau)` multipliers and the decay is applied once.

use alloc::vec::Vec;

use spikecore_npu_neural::{DecayMultiplier, StdpFixed, Tick, DECAY_IDENTITY};
use tracing::warn;

use crate::error::{PlasticityError, Result};
use crate::region::RegionReader;

/// Longest table accepted from a region
pub const MAX_DECAY_TABLE_LEN: u32 = 4096;

/// Decay multipliers indexed by `dt >> time_shift`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecayLookupTable {
    values: Vec<u16>,
    time_shift: u32,
}

impl DecayLookupTable {
    /// Read a `[len][time_shift][len packed u16 values]` block
    pub fn from_region(reader: &mut RegionReader<'_>, name: &'static str) -> Result<Self> {
        let len = reader.read_u32()?;
        let time_shift = reader.read_u32()?;
        // Checked before reading so an absurd length is not mistaken for a short region
        if len > MAX_DECAY_TABLE_LEN {
            return Err(PlasticityError::InvalidRegion {
                block: name,
                reason: "decay table longer than supported",
            });
        }
        let values = reader.read_packed_u16(len as usize, name)?;
        Self::validated(values, time_shift, name)
    }

    /// Build directly from values (host fixtures and tests)
    pub fn from_values(values: Vec<u16>, time_shift: u32) -> Result<Self> {
        Self::validated(values, time_shift, "decay table")
    }

    fn validated(values: Vec<u16>, time_shift: u32, name: &'static str) -> Result<Self> {
        if values.is_empty() {
            return Err(PlasticityError::InvalidRegion {
                block: name,
                reason: "decay table is empty",
            });
        }
        if values.len() > MAX_DECAY_TABLE_LEN as usize {
            return Err(PlasticityError::InvalidRegion {
                block: name,
                reason: "decay table longer than supported",
            });
        }
        if time_shift >= Tick::BITS {
            return Err(PlasticityError::InvalidRegion {
                block: name,
                reason: "time shift exceeds tick width",
            });
        }
        if values.iter().any(|&v| v > DECAY_IDENTITY) {
            return Err(PlasticityError::InvalidRegion {
                block: name,
                reason: "multiplier above identity",
            });
        }

        let table = Self { values, time_shift };
        if !table.starts_at_identity() {
            warn!(
                "[PLASTICITY] Decay table '{}' starts at {} instead of identity {}",
                name, table.values[0], DECAY_IDENTITY
            );
        }
        if !table.is_monotonic() {
            warn!(
                "[PLASTICITY] Decay table '{}' is not monotonically non-increasing",
                name
            );
        }
        Ok(table)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn time_shift(&self) -> u32 {
        self.time_shift
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    /// Multiplier for `dt` elapsed ticks; past the end returns the terminal entry
    #[inline]
    pub fn lookup(&self, dt: Tick) -> DecayMultiplier {
        let index = (dt >> self.time_shift) as usize;
        let last = self.values.len() - 1;
        DecayMultiplier::from_table_entry(self.values[index.min(last)])
    }

    /// Decay `value` by `dt` elapsed ticks
    #[inline]
    pub fn decay(&self, value: StdpFixed, dt: Tick) -> StdpFixed {
        value.decay(self.lookup(dt))
    }

    /// Whether zero elapsed time leaves a value unchanged
    pub fn starts_at_identity(&self) -> bool {
        self.values[0] == DECAY_IDENTITY
    }

    pub fn is_monotonic(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0] >= pair[1])
    }
}
