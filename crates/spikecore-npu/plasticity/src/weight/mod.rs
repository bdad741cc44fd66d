// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Weight-dependence rules
//!
//! A timing rule produces potentiation and depression amounts in the STDP
//! accumulator format. The weight rule turns those amounts into a weight
//! change for one synapse:
//!
//! ```text
//! WeightRule::initial_state ──► UpdateState ──apply_*──► final_state ──► FinalState
//! ```
//!
//! Every variant leaves the final weight inside `[min_weight, max_weight]`.

mod region;

pub use region::WeightRegion;

use alloc::vec::Vec;

use spikecore_npu_neural::synapse::{clamp_weight, weight_from_raw, weight_to_raw};
use spikecore_npu_neural::{mul_shift, StdpFixed, WeightFixed};

use crate::error::{PlasticityError, Result};
use crate::region::RegionReader;
use crate::synapse_structure::SynapseState;

/// Weight-dependence variant, chosen once at initialisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightKind {
    /// Soft bound: changes shrink as the weight nears the bound
    Multiplicative,
    /// Hard bound: amounts are summed and scaled once, then clipped
    Additive,
    /// Two-level: snaps to max above the threshold, otherwise to min
    Step,
}

/// Weight rule with one [`WeightRegion`] per synapse type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightRule {
    kind: WeightKind,
    regions: Vec<WeightRegion>,
}

impl WeightRule {
    /// Read `n_synapse_types` weight region records
    pub fn initialise(
        kind: WeightKind,
        n_synapse_types: u32,
        reader: &mut RegionReader<'_>,
    ) -> Result<Self> {
        if n_synapse_types == 0 {
            return Err(PlasticityError::InvalidRegion {
                block: "weight",
                reason: "no synapse types",
            });
        }
        let mut regions = Vec::new();
        regions
            .try_reserve_exact(n_synapse_types as usize)
            .map_err(|_| PlasticityError::AllocationFailed {
                what: "weight regions",
                elements: n_synapse_types as usize,
            })?;
        for _ in 0..n_synapse_types {
            regions.push(WeightRegion::from_region(reader, kind)?);
        }
        Ok(Self { kind, regions })
    }

    pub fn from_regions(kind: WeightKind, regions: Vec<WeightRegion>) -> Self {
        Self { kind, regions }
    }

    #[inline]
    pub fn kind(&self) -> WeightKind {
        self.kind
    }

    #[inline]
    pub fn n_synapse_types(&self) -> u32 {
        self.regions.len() as u32
    }

    pub fn region(&self, synapse_type: u32) -> Option<&WeightRegion> {
        self.regions.get(synapse_type as usize)
    }

    pub fn regions(&self) -> &[WeightRegion] {
        &self.regions
    }

    /// Start an update for one synapse
    pub fn initial_state(&self, synapse_type: u32, synapse: SynapseState) -> Result<UpdateState<'_>> {
        let region = self
            .region(synapse_type)
            .ok_or(PlasticityError::UnknownSynapseType {
                synapse_type,
                n_synapse_types: self.n_synapse_types(),
            })?;
        let weight = weight_from_raw(synapse.weight);
        Ok(UpdateState {
            kind: self.kind,
            region,
            initial_weight: weight,
            weight,
            potentiation: StdpFixed::ZERO,
            depression: StdpFixed::ZERO,
            accumulator: synapse.accumulator,
            window: synapse.window,
        })
    }
}

/// A synapse weight in the middle of an update
///
/// Created by [`WeightRule::initial_state`] and consumed by
/// [`UpdateState::final_state`].
#[derive(Debug)]
pub struct UpdateState<'a> {
    kind: WeightKind,
    region: &'a WeightRegion,
    initial_weight: i32,
    weight: i32,
    potentiation: StdpFixed,
    depression: StdpFixed,
    /// Recurrent rule event counter
    pub accumulator: i32,
    /// Recurrent rule window length in ticks
    pub window: u32,
}

impl<'a> UpdateState<'a> {
    #[inline]
    pub fn region(&self) -> &'a WeightRegion {
        self.region
    }

    pub fn apply_depression(&mut self, amount: StdpFixed) {
        match self.kind {
            WeightKind::Multiplicative => {
                let r = self.region;
                let scale = mul_shift(self.weight - r.min_weight, r.a2_minus, r.weight_shift);
                let delta = scaled(scale, amount);
                self.weight = clamp_weight(
                    self.weight.saturating_sub(delta),
                    r.min_weight,
                    r.max_weight,
                );
            }
            WeightKind::Additive | WeightKind::Step => {
                self.depression = self.depression.saturating_add(amount);
            }
        }
    }

    pub fn apply_potentiation(&mut self, amount: StdpFixed) {
        match self.kind {
            WeightKind::Multiplicative => {
                let r = self.region;
                let scale = mul_shift(r.max_weight - self.weight, r.a2_plus, r.weight_shift);
                let delta = scaled(scale, amount);
                self.weight = clamp_weight(
                    self.weight.saturating_add(delta),
                    r.min_weight,
                    r.max_weight,
                );
            }
            WeightKind::Additive | WeightKind::Step => {
                self.potentiation = self.potentiation.saturating_add(amount);
            }
        }
    }

    pub fn final_state(self) -> FinalState {
        let r = self.region;
        let weight = match self.kind {
            WeightKind::Multiplicative => self.weight,
            WeightKind::Additive => clamp_weight(self.accumulated_weight(), r.min_weight, r.max_weight),
            WeightKind::Step => {
                if self.accumulated_weight() > r.threshold {
                    r.max_weight
                } else {
                    r.min_weight
                }
            }
        };
        FinalState {
            weight,
            accumulator: self.accumulator,
            window: self.window,
        }
    }

    /// Initial weight plus the scaled, unclipped sum of the recorded amounts
    fn accumulated_weight(&self) -> i32 {
        let r = self.region;
        let delta = scaled(r.a2_plus, self.potentiation)
            .saturating_sub(scaled(r.a2_minus, self.depression));
        self.initial_weight.saturating_add(delta)
    }
}

/// `weight_units * amount`, back in raw weight units
#[inline]
fn scaled(weight_units: i32, amount: StdpFixed) -> i32 {
    let delta: WeightFixed = WeightFixed::from_bits(weight_units).mul(amount);
    delta.to_bits()
}

/// Result of an update, ready to be repacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalState {
    pub weight: i32,
    pub accumulator: i32,
    pub window: u32,
}

impl FinalState {
    pub fn to_synapse(self) -> SynapseState {
        SynapseState {
            weight: weight_to_raw(self.weight),
            accumulator: self.accumulator,
            window: self.window,
        }
    }
}
