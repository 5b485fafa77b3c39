//! Configuration layer for the replay tool.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`ReplayArgs`])
//! - TOML scenario file parsing ([`TomlScenario`], [`TomlStep`])
//! - Validated scenarios ([`Scenario`], [`Step`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Scenario template generation ([`write_default_scenario`])
//! - Default values ([`defaults`])
//!
//! # Boolean Flag Semantics
//!
//! `--no-service` can only disable the connectivity service. If either the
//! CLI flag is set or the scenario says `service_available = false`, the
//! replay runs without a service.

mod cli;
pub mod defaults;
mod error;
mod scenario;
mod toml;
mod validated;


pub use cli::{Cli, Command, ReplayArgs};
pub use error::ConfigError;
pub use scenario::{Scenario, Step};
pub use toml::{TomlScenario, TomlStep, scenario_template};
pub use validated::{ValidatedConfig, write_default_scenario};
