//! Error types for configuration parsing and validation.

use std::net::AddrParseError;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
/// Step numbers are 1-based, matching their order in the scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the scenario file.
    #[error("Failed to read scenario file '{}': {source}", path.display())]
    FileRead {
        /// Path to the scenario file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML scenario.
    #[error("Failed to parse TOML scenario: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write the scenario file (for init command).
    #[error("Failed to write scenario file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the scenario file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The scenario has no steps.
    #[error("Scenario has no steps. Add at least one [[step]] table.")]
    EmptyScenario,

    /// A step refers to network id 0.
    #[error("Step {step}: network id must be non-zero")]
    InvalidNetwork {
        /// Step number
        step: usize,
    },

    /// A link properties step lists an address that does not parse.
    #[error("Step {step}: invalid address '{value}': {source}")]
    InvalidAddress {
        /// Step number
        step: usize,
        /// The address as written
        value: String,
        /// Parse error
        #[source]
        source: AddrParseError,
    },

    /// A wait step is outside the accepted range.
    #[error("Step {step}: wait of {millis}ms is out of range ({min}..={max}ms)")]
    InvalidWait {
        /// Step number
        step: usize,
        /// Requested wait
        millis: u64,
        /// Shortest accepted wait
        min: u64,
        /// Longest accepted wait
        max: u64,
    },
}
