// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Random parameter generators
//!
//! Rejection samplers that turn uniform draws into bounded parameter values.

use spikecore_npu_neural::Accum;
use tracing::error;

use crate::error::{PlasticityError, Result};
use crate::random::MarsKiss64;

/// Draws attempted before a clipped distribution is declared unreachable
pub const MAX_REDRAWS: u32 = 1000;

/// Exponential distribution with scale `beta`, redrawn until inside `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialClipped {
    pub low: Accum,
    pub high: Accum,
    pub beta: Accum,
}

impl ExponentialClipped {
    pub const fn new(low: Accum, high: Accum, beta: Accum) -> Self {
        Self { low, high, beta }
    }

    /// Draw one value in `[low, high]`
    ///
    /// Fails with [`PlasticityError::RedrawsExceeded`] after [`MAX_REDRAWS`]
    /// draws outside the bounds.
    pub fn generate(&self, rng: &mut MarsKiss64) -> Result<Accum> {
        for _ in 0..MAX_REDRAWS {
            let value: Accum = self.beta.mul(rng.exponential());
            if value >= self.low && value <= self.high {
                return Ok(value);
            }
        }
        error!(
            "[PLASTICITY] Maximum redraws exceeded for clipped exponential (low={}, high={}, beta={})",
            self.low.to_bits(),
            self.high.to_bits(),
            self.beta.to_bits()
        );
        Err(PlasticityError::RedrawsExceeded {
            low: self.low,
            high: self.high,
            beta: self.beta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range_thousand_draws() {
        let generator = ExponentialClipped::new(Accum::ZERO, Accum::ONE, Accum::ONE);
        let mut rng = MarsKiss64::default();
        for _ in 0..1000 {
            let value = generator.generate(&mut rng).unwrap();
            assert!(value >= Accum::ZERO && value <= Accum::ONE);
        }
    }

    #[test]
    fn test_unreachable_range_fails() {
        let generator =
            ExponentialClipped::new(Accum::from_int(10), Accum::from_int(11), Accum::from_bits(1));
        let mut rng = MarsKiss64::default();
        let err = generator.generate(&mut rng).unwrap_err();
        assert_eq!(
            err,
            PlasticityError::RedrawsExceeded {
                low: Accum::from_int(10),
                high: Accum::from_int(11),
                beta: Accum::from_bits(1),
            }
        );
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let generator = ExponentialClipped::new(Accum::ONE, Accum::ZERO, Accum::ONE);
        let mut rng = MarsKiss64::new([5, 6, 7, 8]);
        assert!(generator.generate(&mut rng).is_err());
    }

    #[test]
    fn test_deterministic_given_seed() {
        let generator = ExponentialClipped::new(Accum::ZERO, Accum::from_int(4), Accum::from_int(2));
        let mut a = MarsKiss64::new([9, 8, 7, 6]);
        let mut b = MarsKiss64::new([9, 8, 7, 6]);
        for _ in 0..100 {
            assert_eq!(generator.generate(&mut a), generator.generate(&mut b));
        }
    }
}
