// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic weight conversion and clamping
//!
//! Weights are stored as raw `u16` words and computed on as `i32` in the
//! same raw units, so intermediate updates may leave the stored range
//! before being clamped back.

/// Widen a stored weight for computation
#[inline(always)]
pub const fn weight_from_raw(raw: u16) -> i32 {
    raw as i32
}

/// Narrow a computed weight to its stored form, saturating to `[0, u16::MAX]`
///
/// # Example
/// ```
/// use spikecore_npu_neural::synapse::weight_to_raw;
///
/// assert_eq!(weight_to_raw(1234), 1234);
/// assert_eq!(weight_to_raw(-5), 0);
/// assert_eq!(weight_to_raw(70_000), u16::MAX);
/// ```
#[inline]
pub const fn weight_to_raw(weight: i32) -> u16 {
    if weight < 0 {
        0
    } else if weight > u16::MAX as i32 {
        u16::MAX
    } else {
        weight as u16
    }
}

/// Clamp a weight into `[min, max]`
///
/// `min > max` is treated as a degenerate range collapsing onto `max`.
#[inline]
pub const fn clamp_weight(weight: i32, min: i32, max: i32) -> i32 {
    if weight > max {
        max
    } else if weight < min {
        min
    } else {
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_weight() {
        assert_eq!(clamp_weight(150, 0, 200), 150);
        assert_eq!(clamp_weight(300, 0, 255), 255);
        assert_eq!(clamp_weight(5, 10, 255), 10);
    }

    #[test]
    fn test_degenerate_range_collapses_to_max() {
        assert_eq!(clamp_weight(50, 100, 20), 20);
    }

    proptest! {
        #[test]
        fn prop_clamped_weight_survives_storage(
            weight in any::<i32>(),
            min in 0i32..30_000,
            span in 0i32..30_000,
        ) {
            let max = min + span;
            let stored = weight_to_raw(clamp_weight(weight, min, max));
            prop_assert_eq!(weight_from_raw(stored), clamp_weight(weight, min, max));
        }
    }
}
