// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-spikecore-npu-plasticity` to lower one
//! crate's log level to debug.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable listing crates to debug (comma-separated, or `all`)
pub const DEBUG_ENV: &str = "SPIKECORE_DEBUG";

/// Parsed per-crate debug flags
///
/// # Example
/// ```rust
/// use spikecore_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-spikecore-npu-plasticity".to_string()]);
/// assert!(flags.is_enabled("spikecore-npu-plasticity"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all`
    /// enables every known crate. Other arguments are ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for arg in args {
            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }
        flags
    }

    /// Parse a comma-separated crate list as used by `SPIKECORE_DEBUG`
    pub fn from_list(list: &str) -> Self {
        let mut flags = Self::default();
        for crate_name in list.split(',') {
            flags.enable(crate_name.trim());
        }
        flags
    }

    /// Enable one crate; `all` enables every known crate
    pub fn enable(&mut self, crate_name: &str) {
        match crate_name {
            "" => {}
            "all" => {
                self.enabled_crates
                    .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
            }
            name => {
                self.enabled_crates.insert(name.replace('_', "-"));
            }
        }
    }

    /// Merge another set of flags into this one
    pub fn merge(&mut self, other: CrateDebugFlags) {
        self.enabled_crates.extend(other.enabled_crates);
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(&crate_name.replace('_', "-"))
    }

    /// Enabled crates, sorted
    pub fn enabled_crates(&self) -> impl Iterator<Item = &str> {
        self.enabled_crates.iter().map(String::as_str)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Filter directives for the enabled crates
    ///
    /// Tracing targets use the crate's module path, so dashes become
    /// underscores: `spikecore_npu_plasticity=debug`.
    pub fn directives(&self) -> Vec<String> {
        self.enabled_crates
            .iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .collect()
    }
}

/// Parse debug flags from the process arguments and `SPIKECORE_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(list) = env::var(DEBUG_ENV) {
        flags.merge(CrateDebugFlags::from_list(&list));
    }
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  {}={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  {}=all                            Enable debug for all crates
"#,
        KNOWN_CRATES.join(", "),
        DEBUG_ENV,
        DEBUG_ENV
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec![
            "run_core".to_string(),
            "--debug-spikecore-npu-plasticity".to_string(),
        ]);
        assert!(flags.is_enabled("spikecore-npu-plasticity"));
        assert!(flags.is_enabled("spikecore_npu_plasticity"));
        assert!(!flags.is_enabled("spikecore-npu-runtime"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_list_and_merge() {
        let mut flags = CrateDebugFlags::from_list("spikecore-npu-runtime, ,spikecore-config");
        flags.merge(CrateDebugFlags::from_args(vec!["--debug-spikecore".to_string()]));
        assert_eq!(
            flags.enabled_crates().collect::<Vec<_>>(),
            vec!["spikecore", "spikecore-config", "spikecore-npu-runtime"]
        );
    }

    #[test]
    fn test_directives_use_module_paths() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-spikecore-npu-plasticity".to_string()]);
        assert_eq!(flags.directives(), vec!["spikecore_npu_plasticity=debug"]);
        assert!(CrateDebugFlags::default().directives().is_empty());
    }
}
