// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seeded pseudo-random draws
//!
//! `MarsKiss64` combines a linear congruential lane, a xorshift lane and a
//! multiply-with-carry lane (period about 2^123). Every stochastic consumer
//! owns its own instance; there is no shared generator.

use spikecore_npu_neural::{Accum, ACCUM_FRACTIONAL_BITS};

/// Seed used when the host does not supply one
pub const DEFAULT_SEED: [u32; 4] = [123_456_789, 987_654_321, 43_219_876, 6_543_217];

const XORSHIFT_FALLBACK: u32 = 13_031_301;
const CARRY_MODULUS: u32 = 698_769_068;

/// KISS generator with four 32-bit lanes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarsKiss64 {
    seed: [u32; 4],
}

impl MarsKiss64 {
    /// Create a generator from a seed, repairing lanes that would stall
    pub fn new(seed: [u32; 4]) -> Self {
        let mut seed = seed;
        validate_seed(&mut seed);
        Self { seed }
    }

    pub fn seed(&self) -> [u32; 4] {
        self.seed
    }

    /// Full-width uniform draw
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let s = &mut self.seed;
        s[0] = s[0].wrapping_mul(314_527_869).wrapping_add(1_234_567);

        s[1] ^= s[1] << 5;
        s[1] ^= s[1] >> 7;
        s[1] ^= s[1] << 22;

        let t = 4_294_584_393u64 * s[2] as u64 + s[3] as u64;
        s[3] = (t >> 32) as u32;
        s[2] = t as u32;

        s[0].wrapping_add(s[1]).wrapping_add(s[2])
    }

    /// Uniform value in `[0, 1)` in the accumulator format
    #[inline]
    pub fn uniform_accum(&mut self) -> Accum {
        Accum::from_bits((self.next_u32() >> (32 - ACCUM_FRACTIONAL_BITS)) as i32)
    }

    /// Draw an index into a table with `2^bits` entries
    #[inline]
    pub fn fixed_point_index(&mut self, bits: u32) -> usize {
        let mask = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
        (self.next_u32() & mask) as usize
    }

    /// Exponential(1) variate by von Neumann's comparison method
    ///
    /// Only uniform draws and comparisons are used; the integer part counts
    /// rejected runs and the fraction is the first draw of the accepted run.
    pub fn exponential(&mut self) -> Accum {
        let mut whole: i32 = 0;
        loop {
            let first = self.next_u32();
            let mut u = first;
            loop {
                let u_star = self.next_u32();
                if u < u_star {
                    let fraction = (first >> (32 - ACCUM_FRACTIONAL_BITS)) as i32;
                    return Accum::from_int(whole).saturating_add(Accum::from_bits(fraction));
                }
                u = self.next_u32();
                if u >= u_star {
                    break;
                }
            }
            whole = whole.saturating_add(1);
        }
    }
}

impl Default for MarsKiss64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

fn validate_seed(seed: &mut [u32; 4]) {
    if seed[1] == 0 {
        seed[1] = XORSHIFT_FALLBACK;
    }
    seed[3] = seed[3] % CARRY_MODULUS + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MarsKiss64::new([1, 2, 3, 4]);
        let mut b = MarsKiss64::new([1, 2, 3, 4]);
        for _ in 0..10_000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = MarsKiss64::new([1, 2, 3, 4]);
        let mut b = MarsKiss64::new([1, 2, 3, 5]);
        let same = (0..64).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 4);
    }

    #[test]
    fn test_seed_validation() {
        let rng = MarsKiss64::new([0, 0, 0, CARRY_MODULUS]);
        let seed = rng.seed();
        assert_eq!(seed[1], XORSHIFT_FALLBACK);
        assert_eq!(seed[3], 1);
    }

    #[test]
    fn test_first_draws_of_default_seed() {
        // Hand-computed from the recurrence on the validated default seed
        let mut s = DEFAULT_SEED;
        validate_seed(&mut s);
        s[0] = s[0].wrapping_mul(314_527_869).wrapping_add(1_234_567);
        s[1] ^= s[1] << 5;
        s[1] ^= s[1] >> 7;
        s[1] ^= s[1] << 22;
        let t = 4_294_584_393u64 * s[2] as u64 + s[3] as u64;
        let expected = s[0].wrapping_add(s[1]).wrapping_add(t as u32);

        let mut rng = MarsKiss64::default();
        assert_eq!(rng.next_u32(), expected);
    }

    #[test]
    fn test_fixed_point_index_in_range() {
        let mut rng = MarsKiss64::default();
        for _ in 0..5_000 {
            assert!(rng.fixed_point_index(11) < 2048);
        }
    }

    #[test]
    fn test_uniform_accum_below_one() {
        let mut rng = MarsKiss64::default();
        for _ in 0..5_000 {
            let u = rng.uniform_accum();
            assert!(u >= Accum::ZERO && u < Accum::ONE);
        }
    }

    #[test]
    fn test_exponential_mean_near_one() {
        let mut rng = MarsKiss64::new([11, 22, 33, 44]);
        let n = 20_000i64;
        let sum: i64 = (0..n).map(|_| rng.exponential().to_bits() as i64).sum();
        let mean = sum as f64 / n as f64 / Accum::ONE.to_bits() as f64;
        assert!((mean - 1.0).abs() < 0.05, "mean = {}", mean);
    }

    #[test]
    fn test_exponential_non_negative() {
        let mut rng = MarsKiss64::default();
        for _ in 0..5_000 {
            assert!(rng.exponential() >= Accum::ZERO);
        }
    }
}
