//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the replay command. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use super::cli::ReplayArgs;
use super::error::ConfigError;
use super::scenario::Scenario;
use super::toml::{TomlScenario, scenario_template};

/// Fully validated configuration for a replay run.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path the scenario was loaded from
    pub scenario_path: PathBuf,

    /// The validated scenario, with CLI overrides applied
    pub scenario: Scenario,

    /// Print the report as JSON
    pub json: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ scenario: {}, steps: {}, service_available: {}, json: {} }}",
            self.scenario_path.display(),
            self.scenario.steps.len(),
            self.scenario.service_available,
            self.json,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from replay arguments and a parsed
    /// scenario file.
    ///
    /// `--no-service` wins over `service_available = true`; it can only
    /// disable the service, never enable it.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario fails validation.
    pub fn from_raw(
        args: &ReplayArgs,
        verbose: bool,
        toml: &TomlScenario,
    ) -> Result<Self, ConfigError> {
        let mut scenario = Scenario::from_toml(toml)?;
        scenario.service_available &= !args.no_service;

        Ok(Self {
            scenario_path: args.scenario.clone(),
            scenario,
            json: args.json,
            verbose,
        })
    }

    /// Loads the scenario file named in `args` and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(args: &ReplayArgs, verbose: bool) -> Result<Self, ConfigError> {
        let toml = TomlScenario::load(&args.scenario)?;
        Self::from_raw(args, verbose, &toml)
    }
}

/// Writes the scenario template to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_scenario(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, scenario_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
