// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point numeric layer
//!
//! Every value declares its format (number of fractional bits) in its type.
//! Values of different formats never mix implicitly: a multiply either names
//! the input and output formats statically ([`Fixed::mul`]) or takes the
//! shift explicitly ([`mul_shift`]) when the format is only known after
//! initialisation (per synapse-type weight shifts).
//!
//! Overflow is defined behaviour: every operation saturates to the range of
//! the destination format. Right shifts truncate toward zero.

/// Fractional bits of the STDP accumulator format (traces, timing amounts)
pub const STDP_FIXED_POINT: u32 = 15;

/// `1.0` in the STDP accumulator format
pub const STDP_FIXED_POINT_ONE: i32 = 1 << STDP_FIXED_POINT;

/// Fractional bits of decay multipliers stored in lookup tables
pub const DECAY_FIXED_POINT: u32 = 15;

/// Decay multiplier for zero elapsed time (`exp(0) = 1.0`)
pub const DECAY_IDENTITY: u16 = 1 << DECAY_FIXED_POINT;

/// Fractional bits of the S16.15 accumulator used by parameter generators
pub const ACCUM_FRACTIONAL_BITS: u32 = 15;

/// Clamp a 64-bit intermediate into the i32 range
#[inline]
pub const fn saturate_i64(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

/// Arithmetic right shift rounding toward zero (not toward -inf)
#[inline]
pub const fn shift_right_truncating(value: i64, shift: u32) -> i64 {
    if shift >= 63 {
        return 0;
    }
    if value < 0 {
        -((-value) >> shift)
    } else {
        value >> shift
    }
}

/// Saturating left shift of a 64-bit intermediate into the i32 range
#[inline]
const fn shift_left_saturating(value: i64, shift: u32) -> i32 {
    if value == 0 {
        return 0;
    }
    if shift >= 64 {
        return if value > 0 { i32::MAX } else { i32::MIN };
    }
    let wide = (value as i128) << shift;
    if wide > i32::MAX as i128 {
        i32::MAX
    } else if wide < i32::MIN as i128 {
        i32::MIN
    } else {
        wide as i32
    }
}

/// Multiply two raw fixed-point values and shift the product right
///
/// The caller supplies the shift (derived once at initialisation from the
/// ratio of the two formats), so no division happens at runtime.
///
/// # Example
/// ```
/// use spikecore_npu_neural::types::fixed::{mul_shift, STDP_FIXED_POINT, STDP_FIXED_POINT_ONE};
///
/// // 0.5 * 0.5 = 0.25 in the STDP format
/// let half = STDP_FIXED_POINT_ONE / 2;
/// assert_eq!(mul_shift(half, half, STDP_FIXED_POINT), STDP_FIXED_POINT_ONE / 4);
///
/// // Negative products truncate toward zero
/// assert_eq!(mul_shift(-3, 1, 1), -1);
/// ```
#[inline]
pub const fn mul_shift(a: i32, b: i32, shift: u32) -> i32 {
    saturate_i64(shift_right_truncating(a as i64 * b as i64, shift))
}

/// Apply a decay multiplier: `value * multiplier >> DECAY_FIXED_POINT`
///
/// Truncates toward zero. This is the single decay rounding rule used by
/// every trace computation.
#[inline]
pub const fn decay(value: i32, multiplier: u16) -> i32 {
    mul_shift(value, multiplier as i32, DECAY_FIXED_POINT)
}

/// Signed fixed-point value with `FRAC` fractional bits (i32 backing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Fixed<const FRAC: u32>(i32);

/// STDP accumulator format (traces, potentiation/depression amounts)
pub type StdpFixed = Fixed<STDP_FIXED_POINT>;

/// S16.15 accumulator used for distribution parameters
pub type Accum = Fixed<ACCUM_FRACTIONAL_BITS>;

/// Weights in raw stored units
///
/// The per synapse-type `weight_shift` is a runtime value, so rate
/// constants are applied with [`mul_shift`] before a result re-enters this
/// format.
pub type WeightFixed = Fixed<0>;

impl<const FRAC: u32> Fixed<FRAC> {
    /// Number of fractional bits in this format
    pub const FRACTIONAL_BITS: u32 = FRAC;
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRAC);
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);

    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Integer value in this format, saturating at the format limits
    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self(shift_left_saturating(value as i64, FRAC))
    }

    /// Integer part, truncated toward zero
    #[inline]
    pub const fn to_int(self) -> i32 {
        shift_right_truncating(self.0 as i64, FRAC) as i32
    }

    #[inline]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Multiply by a value in format `RHS`, producing format `OUT`
    ///
    /// The rescale shift is `FRAC + RHS - OUT`; a negative shift becomes a
    /// saturating left shift.
    #[inline]
    pub fn mul<const RHS: u32, const OUT: u32>(self, rhs: Fixed<RHS>) -> Fixed<OUT> {
        let product = self.0 as i64 * rhs.to_bits() as i64;
        let in_bits = FRAC + RHS;
        if in_bits >= OUT {
            Fixed::from_bits(saturate_i64(shift_right_truncating(product, in_bits - OUT)))
        } else {
            Fixed::from_bits(shift_left_saturating(product, OUT - in_bits))
        }
    }

    /// Decay this value by a lookup-table multiplier
    #[inline]
    pub const fn decay(self, multiplier: DecayMultiplier) -> Self {
        Self(decay(self.0, multiplier.to_bits()))
    }

    /// Host-side conversion (fixtures, tests, tooling)
    #[cfg(feature = "std")]
    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * (1u64 << FRAC) as f64).round();
        if scaled >= i32::MAX as f64 {
            Self(i32::MAX)
        } else if scaled <= i32::MIN as f64 {
            Self(i32::MIN)
        } else {
            Self(scaled as i32)
        }
    }

    /// Host-side conversion (fixtures, tests, tooling)
    #[cfg(feature = "std")]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC) as f64
    }
}

impl<const FRAC: u32> core::ops::Add for Fixed<FRAC> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl<const FRAC: u32> core::ops::Sub for Fixed<FRAC> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

/// Unsigned fixed-point value with `FRAC` fractional bits (u32 backing)
///
/// `FRAC` must be below 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct UFixed<const FRAC: u32>(u32);

/// Multiplier read from a decay lookup table
pub type DecayMultiplier = UFixed<DECAY_FIXED_POINT>;

impl<const FRAC: u32> UFixed<FRAC> {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRAC);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl DecayMultiplier {
    /// No decay (zero elapsed time)
    pub const IDENTITY: Self = Self(DECAY_IDENTITY as u32);

    #[inline]
    pub const fn from_table_entry(entry: u16) -> Self {
        Self(entry as u32)
    }

    /// Raw table entry; multipliers never exceed `DECAY_IDENTITY`
    #[inline]
    pub const fn to_bits(self) -> u16 {
        if self.0 > u16::MAX as u32 {
            u16::MAX
        } else {
            self.0 as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_add_clamps() {
        let a = StdpFixed::from_bits(i32::MAX - 1);
        assert_eq!((a + StdpFixed::ONE).to_bits(), i32::MAX);
        let b = StdpFixed::from_bits(i32::MIN + 1);
        assert_eq!((b - StdpFixed::ONE).to_bits(), i32::MIN);
    }

    #[test]
    fn test_shift_truncates_toward_zero() {
        assert_eq!(mul_shift(7, 1, 1), 3);
        assert_eq!(mul_shift(-7, 1, 1), -3);
        assert_eq!(shift_right_truncating(-1, 4), 0);
    }

    #[test]
    fn test_mul_between_formats() {
        let half: Fixed<15> = Fixed::from_bits(1 << 14);
        let three: Fixed<4> = Fixed::from_int(3);
        let product: Fixed<8> = half.mul(three);
        // 0.5 * 3 = 1.5 -> 384 in an 8-bit format
        assert_eq!(product.to_bits(), 384);
    }

    #[test]
    fn test_mul_saturates() {
        let big: Fixed<0> = Fixed::from_bits(i32::MAX);
        let out: Fixed<0> = big.mul::<0, 0>(Fixed::from_bits(4));
        assert_eq!(out.to_bits(), i32::MAX);
    }

    #[test]
    fn test_amount_scales_weight_units() {
        // 1.5 in the STDP format applied to 100 raw weight units
        let amount = StdpFixed::from_bits(3 << 14);
        let delta: WeightFixed = WeightFixed::from_int(100).mul(amount);
        assert_eq!(delta.to_int(), 150);
        let negative: WeightFixed = WeightFixed::from_int(-7).mul(StdpFixed::from_bits(1 << 14));
        assert_eq!(negative.to_int(), -3);
    }

    #[test]
    fn test_decay_identity_and_half() {
        let trace = StdpFixed::from_int(3);
        assert_eq!(trace.decay(DecayMultiplier::IDENTITY), trace);
        let half = DecayMultiplier::from_table_entry(DECAY_IDENTITY / 2);
        assert_eq!(trace.decay(half).to_bits(), trace.to_bits() / 2);
        assert_eq!(decay(-3, DECAY_IDENTITY / 2), -1);
    }

    #[test]
    fn test_from_int_saturates() {
        assert_eq!(StdpFixed::from_int(1 << 20), StdpFixed::MAX);
        assert_eq!(StdpFixed::from_int(-(1 << 20)), StdpFixed::MIN);
        assert_eq!(StdpFixed::from_int(-2).to_int(), -2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_float_round_trip() {
        let value = Accum::from_f64(1.25);
        assert_eq!(value.to_bits(), 5 << 13);
        assert!((value.to_f64() - 1.25).abs() < 1e-9);
    }
}
