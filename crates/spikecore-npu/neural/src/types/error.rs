// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for word packing and layout validation

use core::fmt;

#[cfg(feature = "std")]
extern crate std;

/// Errors raised while building or packing synaptic words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuralError {
    /// A field does not fit in the bits reserved for it
    FieldOverflow {
        field: &'static str,
        value: u32,
        bits: u32,
    },

    /// The configured field widths do not fit in a 32-bit word
    InvalidLayout {
        index_bits: u32,
        type_bits: u32,
        delay_bits: u32,
    },
}

impl fmt::Display for NeuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeuralError::FieldOverflow { field, value, bits } => {
                write!(f, "Field {} = {} does not fit in {} bits", field, value, bits)
            }
            NeuralError::InvalidLayout {
                index_bits,
                type_bits,
                delay_bits,
            } => write!(
                f,
                "Invalid word layout: index {} + type {} + delay {} bits exceeds 32",
                index_bits, type_bits, delay_bits
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NeuralError {}

pub type Result<T> = core::result::Result<T, NeuralError>;
pub type Error = NeuralError;
