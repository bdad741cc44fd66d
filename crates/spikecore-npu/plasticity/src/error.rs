// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for plasticity initialisation and row processing

use core::fmt;

use spikecore_npu_neural::Accum;

#[cfg(feature = "std")]
extern crate std;

/// Plasticity errors
///
/// Everything except [`PlasticityError::RowMalformed`],
/// [`PlasticityError::UnknownSynapseType`] and
/// [`PlasticityError::NeuronOutOfRange`] is fatal to core start-up. The
/// first two only reach callers inside
/// [`RowOutcome::Rejected`](crate::RowOutcome::Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlasticityError {
    /// The region ended before a block could be read
    RegionExhausted {
        /// Words requested
        requested: usize,
        /// Words left in the region
        available: usize,
    },

    /// A region block holds values that cannot be used
    InvalidRegion {
        /// Which block
        block: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Local memory for tables or histories could not be reserved
    AllocationFailed {
        /// What was being allocated
        what: &'static str,
        /// Requested element count
        elements: usize,
    },

    /// A control word names a synapse type with no weight region
    UnknownSynapseType {
        synapse_type: u32,
        n_synapse_types: u32,
    },

    /// A control word or post event names a neuron outside the population
    NeuronOutOfRange { neuron: u32, n_neurons: u32 },

    /// The row buffer is shorter than its header claims
    RowMalformed {
        /// Buffer length in words
        words: usize,
        /// Synapse count from the header
        synapses: u32,
    },

    /// A clipped random parameter never landed inside its bounds
    RedrawsExceeded { low: Accum, high: Accum, beta: Accum },
}

impl fmt::Display for PlasticityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlasticityError::RegionExhausted {
                requested,
                available,
            } => write!(
                f,
                "Region exhausted: requested {} words, {} available",
                requested, available
            ),
            PlasticityError::InvalidRegion { block, reason } => {
                write!(f, "Invalid region block '{}': {}", block, reason)
            }
            PlasticityError::AllocationFailed { what, elements } => {
                write!(f, "Unable to allocate {} ({} elements)", what, elements)
            }
            PlasticityError::UnknownSynapseType {
                synapse_type,
                n_synapse_types,
            } => write!(
                f,
                "Unknown synapse type {} (configured types: {})",
                synapse_type, n_synapse_types
            ),
            PlasticityError::NeuronOutOfRange { neuron, n_neurons } => {
                write!(f, "Neuron {} out of range (population: {})", neuron, n_neurons)
            }
            PlasticityError::RowMalformed { words, synapses } => write!(
                f,
                "Malformed row: {} words cannot hold {} synapses",
                words, synapses
            ),
            PlasticityError::RedrawsExceeded { low, high, beta } => write!(
                f,
                "Maximum redraws exceeded for clipped exponential (low={}, high={}, beta={})",
                low.to_bits(),
                high.to_bits(),
                beta.to_bits()
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlasticityError {}

/// Result type for plasticity operations
pub type Result<T> = core::result::Result<T, PlasticityError>;
