// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per synapse type weight configuration

use tracing::warn;

use super::WeightKind;
use crate::error::{PlasticityError, Result};
use crate::region::RegionReader;

/// Static weight configuration for one synapse type
///
/// Weights are raw synaptic-word units. `a2_plus`/`a2_minus` are rate
/// constants; the multiplicative rule scales them down by `weight_shift`
/// so that fractional rates can be expressed in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightRegion {
    pub min_weight: i32,
    pub max_weight: i32,
    pub a2_plus: i32,
    pub a2_minus: i32,
    pub weight_shift: u32,
    /// Step rule switch point
    pub threshold: i32,
}

impl WeightRegion {
    /// Words per record: `[min][max][a2_plus][a2_minus][weight_shift][threshold]`
    pub const RECORD_WORDS: usize = 6;

    pub fn from_region(reader: &mut RegionReader<'_>, kind: WeightKind) -> Result<Self> {
        let words = reader.read_words(Self::RECORD_WORDS)?;
        let region = Self {
            min_weight: words[0] as i32,
            max_weight: words[1] as i32,
            a2_plus: words[2] as i32,
            a2_minus: words[3] as i32,
            weight_shift: words[4],
            threshold: words[5] as i32,
        };
        region.validate(kind)?;
        Ok(region)
    }

    pub fn to_words(&self) -> [u32; Self::RECORD_WORDS] {
        [
            self.min_weight as u32,
            self.max_weight as u32,
            self.a2_plus as u32,
            self.a2_minus as u32,
            self.weight_shift,
            self.threshold as u32,
        ]
    }

    pub fn validate(&self, kind: WeightKind) -> Result<()> {
        if self.min_weight < 0 || self.max_weight > u16::MAX as i32 {
            return Err(PlasticityError::InvalidRegion {
                block: "weight",
                reason: "weight bounds outside the 16-bit synaptic weight",
            });
        }
        if self.min_weight > self.max_weight {
            return Err(PlasticityError::InvalidRegion {
                block: "weight",
                reason: "min_weight above max_weight",
            });
        }
        if self.weight_shift >= 32 {
            return Err(PlasticityError::InvalidRegion {
                block: "weight",
                reason: "weight_shift must be below 32",
            });
        }
        if kind == WeightKind::Step
            && (self.threshold < self.min_weight || self.threshold > self.max_weight)
        {
            warn!(
                "[PLASTICITY] Step threshold {} outside [{}, {}]; every synapse will snap to one level",
                self.threshold, self.min_weight, self.max_weight
            );
        }
        Ok(())
    }
}
