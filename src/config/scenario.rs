//! Validated replay scenarios.

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::connectivity::{LinkProperties, NetworkCapabilities, NetworkId};

use super::defaults;
use super::error::ConfigError;
use super::toml::{TomlScenario, TomlStep};

/// A scenario whose steps have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Whether the session gets a connectivity service handle.
    pub service_available: bool,
    /// Steps in the order they are applied.
    pub steps: Vec<Step>,
}

/// One validated scenario step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Start the observation session.
    Start,
    /// Stop the observation session.
    Stop,
    /// Bring a network up.
    Connect {
        /// The network
        network: NetworkId,
        /// Its capabilities
        capabilities: NetworkCapabilities,
    },
    /// Replace a network's capabilities.
    UpdateCapabilities {
        /// The network
        network: NetworkId,
        /// Capabilities after the change
        capabilities: NetworkCapabilities,
    },
    /// Report new link properties.
    UpdateLinkProperties {
        /// The network
        network: NetworkId,
        /// Link properties after the change
        properties: LinkProperties,
    },
    /// Take a network down.
    Disconnect {
        /// The network
        network: NetworkId,
    },
    /// Pause before the next step.
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
            Self::Connect { network, .. } => write!(f, "connect {network}"),
            Self::UpdateCapabilities { network, .. } => write!(f, "capabilities {network}"),
            Self::UpdateLinkProperties {
                network,
                properties,
            } => write!(
                f,
                "link properties {network} ({})",
                properties.interface_name
            ),
            Self::Disconnect { network } => write!(f, "disconnect {network}"),
            Self::Wait(duration) => write!(f, "wait {}ms", duration.as_millis()),
        }
    }
}

impl Scenario {
    /// Validates a parsed scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The scenario has no steps
    /// - A step uses network id 0
    /// - A link address does not parse
    /// - A wait is outside `MIN_WAIT_MS..=MAX_WAIT_MS`
    pub fn from_toml(raw: &TomlScenario) -> Result<Self, ConfigError> {
        if raw.steps.is_empty() {
            return Err(ConfigError::EmptyScenario);
        }

        let steps = raw
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| Self::validate_step(index + 1, step))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            service_available: raw
                .service_available
                .unwrap_or(defaults::SERVICE_AVAILABLE),
            steps,
        })
    }

    fn validate_step(number: usize, raw: &TomlStep) -> Result<Step, ConfigError> {
        let step = match raw {
            TomlStep::Start => Step::Start,
            TomlStep::Stop => Step::Stop,
            TomlStep::Connect {
                network,
                capabilities,
            } => Step::Connect {
                network: network_id(number, *network)?,
                capabilities: capabilities.iter().copied().collect(),
            },
            TomlStep::Capabilities {
                network,
                capabilities,
            } => Step::UpdateCapabilities {
                network: network_id(number, *network)?,
                capabilities: capabilities.iter().copied().collect(),
            },
            TomlStep::LinkProperties {
                network,
                interface,
                addresses,
            } => Step::UpdateLinkProperties {
                network: network_id(number, *network)?,
                properties: LinkProperties::new(
                    interface.clone(),
                    parse_addresses(number, addresses)?,
                ),
            },
            TomlStep::Disconnect { network } => Step::Disconnect {
                network: network_id(number, *network)?,
            },
            TomlStep::Wait { millis } => Step::Wait(wait_duration(number, *millis)?),
        };
        Ok(step)
    }
}

fn network_id(step: usize, raw: u64) -> Result<NetworkId, ConfigError> {
    if raw == 0 {
        return Err(ConfigError::InvalidNetwork { step });
    }
    Ok(NetworkId(raw))
}

fn parse_addresses(step: usize, raw: &[String]) -> Result<Vec<IpAddr>, ConfigError> {
    raw.iter()
        .map(|value| {
            value
                .trim()
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidAddress {
                    step,
                    value: value.clone(),
                    source,
                })
        })
        .collect()
}

fn wait_duration(step: usize, millis: u64) -> Result<Duration, ConfigError> {
    if millis < defaults::MIN_WAIT_MS || millis > defaults::MAX_WAIT_MS {
        return Err(ConfigError::InvalidWait {
            step,
            millis,
            min: defaults::MIN_WAIT_MS,
            max: defaults::MAX_WAIT_MS,
        });
    }
    Ok(Duration::from_millis(millis))
}
