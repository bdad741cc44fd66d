// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region cursor
//!
//! The host prepares a read-only block of `u32` words per core. Each
//! sub-module consumes its section through a [`RegionReader`] and hands the
//! advanced cursor on to the next one.

use alloc::vec::Vec;

use crate::error::{PlasticityError, Result};

/// Bounds-checked cursor over a region block
#[derive(Debug, Clone)]
pub struct RegionReader<'r> {
    words: &'r [u32],
    offset: usize,
}

impl<'r> RegionReader<'r> {
    pub fn new(words: &'r [u32]) -> Self {
        Self { words, offset: 0 }
    }

    /// Words consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.words.len() - self.offset
    }

    /// Unconsumed tail of the region
    pub fn rest(&self) -> &'r [u32] {
        &self.words[self.offset..]
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_words(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_seed(&mut self) -> Result<[u32; 4]> {
        let words = self.read_words(4)?;
        Ok([words[0], words[1], words[2], words[3]])
    }

    pub fn read_words(&mut self, count: usize) -> Result<&'r [u32]> {
        if count > self.remaining() {
            return Err(PlasticityError::RegionExhausted {
                requested: count,
                available: self.remaining(),
            });
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.words[start..self.offset])
    }

    /// Read `count` u16 values packed two per word, low half first
    pub fn read_packed_u16(&mut self, count: usize, what: &'static str) -> Result<Vec<u16>> {
        let words = self.read_words(count.div_ceil(2))?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(count)
            .map_err(|_| PlasticityError::AllocationFailed {
                what,
                elements: count,
            })?;
        for i in 0..count {
            let word = words[i / 2];
            let half = if i % 2 == 0 { word } else { word >> 16 };
            values.push(half as u16);
        }
        Ok(values)
    }
}

/// Host-side builder producing region blocks in the layout the readers expect
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone)]
pub struct RegionWriter {
    words: Vec<u32>,
}

#[cfg(feature = "std")]
impl RegionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_u32(&mut self, value: u32) -> &mut Self {
        self.words.push(value);
        self
    }

    pub fn push_i32(&mut self, value: i32) -> &mut Self {
        self.words.push(value as u32);
        self
    }

    pub fn push_seed(&mut self, seed: [u32; 4]) -> &mut Self {
        self.words.extend_from_slice(&seed);
        self
    }

    /// Append u16 values packed two per word, low half first
    pub fn push_packed_u16(&mut self, values: &[u16]) -> &mut Self {
        for pair in values.chunks(2) {
            let low = pair[0] as u32;
            let high = pair.get(1).copied().unwrap_or(0) as u32;
            self.words.push(low | (high << 16));
        }
        self
    }

    /// Append a decay table block: `[len][time_shift][values...]`
    pub fn push_decay_table(&mut self, values: &[u16], time_shift: u32) -> &mut Self {
        self.push_u32(values.len() as u32);
        self.push_u32(time_shift);
        self.push_packed_u16(values)
    }

    /// Append a decay table sampled from `exp(-dt / tau)`
    ///
    /// Entry `i` covers `dt = i << time_shift`.
    pub fn push_exp_decay_table(&mut self, tau: f64, len: usize, time_shift: u32) -> &mut Self {
        let values = exp_decay_entries(tau, len, time_shift);
        self.push_decay_table(&values, time_shift)
    }

    /// Append a window-length table of exponential quantiles with `mean` ticks
    pub fn push_exp_dist_table(&mut self, mean: f64, len: usize) -> &mut Self {
        let values = exp_dist_entries(mean, len);
        self.push_packed_u16(&values)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }
}

/// Sample `exp(-dt / tau)` into decay-format table entries
#[cfg(feature = "std")]
pub fn exp_decay_entries(tau: f64, len: usize, time_shift: u32) -> Vec<u16> {
    use spikecore_npu_neural::DECAY_IDENTITY;

    (0..len)
        .map(|i| {
            let dt = (i as u64) << time_shift;
            let value = (-(dt as f64) / tau).exp() * DECAY_IDENTITY as f64;
            value.round().clamp(0.0, DECAY_IDENTITY as f64) as u16
        })
        .collect()
}

/// Quantiles of an exponential distribution with `mean`, one per table slot
///
/// Indexing the table with a uniform random index draws a window length.
#[cfg(feature = "std")]
pub fn exp_dist_entries(mean: f64, len: usize) -> Vec<u16> {
    (0..len)
        .map(|i| {
            let p = (i as f64 + 0.5) / len as f64;
            let value = -mean * (1.0 - p).ln();
            value.round().clamp(0.0, u16::MAX as f64) as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_advances() {
        let words = [1u32, 2, 0xFFFF_FFFF, 4];
        let mut reader = RegionReader::new(&words);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert_eq!(reader.read_u32().unwrap(), 2);
        assert_eq!(reader.read_i32().unwrap(), -1);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.rest(), &[4]);
    }

    #[test]
    fn test_reader_exhausted() {
        let words = [1u32, 2];
        let mut reader = RegionReader::new(&words);
        let err = reader.read_words(3).unwrap_err();
        assert_eq!(
            err,
            PlasticityError::RegionExhausted {
                requested: 3,
                available: 2
            }
        );
        // Failed reads do not move the cursor
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_packed_u16_odd_count() {
        let mut writer = RegionWriter::new();
        writer.push_packed_u16(&[1, 2, 3]);
        assert_eq!(writer.words(), &[1 | (2 << 16), 3]);

        let words = writer.into_words();
        let mut reader = RegionReader::new(&words);
        assert_eq!(reader.read_packed_u16(3, "test").unwrap(), vec![1, 2, 3]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_exp_decay_entries_shape() {
        let values = exp_decay_entries(20.0, 64, 0);
        assert_eq!(values[0], spikecore_npu_neural::DECAY_IDENTITY);
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values[63] < values[1]);
    }

    #[test]
    fn test_exp_dist_entries_mean() {
        let values = exp_dist_entries(20.0, 2048);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
        assert!((mean - 20.0).abs() < 1.0, "mean = {}", mean);
    }
}
