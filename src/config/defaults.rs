//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default output path for `init`.
pub const SCENARIO_FILE: &str = "scenario.toml";

/// Whether a scenario has a connectivity service unless it says otherwise.
pub const SERVICE_AVAILABLE: bool = true;

/// Shortest accepted `wait` step in milliseconds.
pub const MIN_WAIT_MS: u64 = 1;

/// Longest accepted `wait` step in milliseconds.
pub const MAX_WAIT_MS: u64 = 60_000;

