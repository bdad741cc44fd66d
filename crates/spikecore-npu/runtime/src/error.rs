// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use core::fmt;

use spikecore_npu_plasticity::PlasticityError;

#[cfg(feature = "std")]
extern crate std;

/// Runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    /// A callback arrived while another one still held the engine
    Reentrant {
        /// Callback that was rejected
        callback: &'static str,
    },

    /// The plasticity engine could not be built; the core must not start
    Initialisation(PlasticityError),

    /// Event processing failed
    Plasticity(PlasticityError),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Reentrant { callback } => {
                write!(f, "Re-entrant {} rejected: engine busy", callback)
            }
            RuntimeError::Initialisation(err) => {
                write!(f, "Core initialisation failed: {}", err)
            }
            RuntimeError::Plasticity(err) => write!(f, "Plasticity error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Initialisation(err) | RuntimeError::Plasticity(err) => Some(err),
            RuntimeError::Reentrant { .. } => None,
        }
    }
}

impl From<PlasticityError> for RuntimeError {
    fn from(err: PlasticityError) -> Self {
        RuntimeError::Plasticity(err)
    }
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
