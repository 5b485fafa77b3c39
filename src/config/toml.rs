//! TOML scenario file parsing.
//!
//! Defines the structure of the scenario file with serde.

use std::path::Path;

use serde::Deserialize;

use crate::connectivity::NetworkCapability;

use super::ConfigError;

/// Root structure of a scenario file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlScenario {
    /// Whether the connectivity service exists (default: true)
    pub service_available: Option<bool>,

    /// Steps, applied in file order
    #[serde(default, rename = "step")]
    pub steps: Vec<TomlStep>,
}

/// One `[[step]]` table, selected by its `action` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum TomlStep {
    /// Start the observation session
    Start,

    /// Stop the observation session
    Stop,

    /// Bring a network up
    Connect {
        /// Network id
        network: u64,
        /// Capabilities the network has
        #[serde(default)]
        capabilities: Vec<NetworkCapability>,
    },

    /// Replace a network's capabilities
    Capabilities {
        /// Network id
        network: u64,
        /// Capabilities after the change
        #[serde(default)]
        capabilities: Vec<NetworkCapability>,
    },

    /// Report new link properties for a network
    LinkProperties {
        /// Network id
        network: u64,
        /// Interface name
        interface: String,
        /// Addresses on the link
        #[serde(default)]
        addresses: Vec<String>,
    },

    /// Take a network down
    Disconnect {
        /// Network id
        network: u64,
    },

    /// Pause before the next step
    Wait {
        /// Pause length in milliseconds
        millis: u64,
    },
}

impl TomlScenario {
    /// Loads a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a commented scenario file.
#[must_use]
pub fn scenario_template() -> String {
    r#"# netwatch-bridge replay scenario
#
# Each [[step]] is applied in order to a simulated connectivity service
# while an observation session watches it. The session watches networks
# with the "not_restricted" capability.
#
# Capabilities: internet, not_restricted, not_metered, not_vpn, trusted, validated

# Set to false to replay without a connectivity service
# (start logs an error and nothing is ever delivered)
service_available = true

[[step]]
action = "start"

[[step]]
action = "connect"
network = 100
capabilities = ["not_restricted", "internet"]

[[step]]
action = "link_properties"
network = 100
interface = "wlan0"
addresses = ["192.168.1.20", "fe80::1"]

# Pause in milliseconds (1..=60000)
[[step]]
action = "wait"
millis = 100

[[step]]
action = "capabilities"
network = 100
capabilities = ["not_restricted", "internet", "validated"]

[[step]]
action = "stop"

# Not forwarded: the session is stopped
[[step]]
action = "disconnect"
network = 100
"#
    .to_string()
}
