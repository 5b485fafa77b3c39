//! Network capabilities and the selectors built from them.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// A capability a network may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkCapability {
    /// The network can reach the public internet.
    Internet,
    /// The network is available to regular applications.
    NotRestricted,
    /// Traffic on the network is not metered.
    NotMetered,
    /// The network is not a VPN.
    NotVpn,
    /// The network is trusted by the user.
    Trusted,
    /// Connectivity on the network has been validated.
    Validated,
}

impl fmt::Display for NetworkCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Internet => "internet",
            Self::NotRestricted => "not_restricted",
            Self::NotMetered => "not_metered",
            Self::NotVpn => "not_vpn",
            Self::Trusted => "trusted",
            Self::Validated => "validated",
        };
        f.write_str(name)
    }
}

/// The set of capabilities a network currently has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCapabilities {
    capabilities: BTreeSet<NetworkCapability>,
}

impl NetworkCapabilities {
    /// Creates an empty capability set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capabilities: BTreeSet::new(),
        }
    }

    /// Returns `true` if the network has `capability`.
    #[must_use]
    pub fn has(&self, capability: NetworkCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Iterates over the capabilities in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = NetworkCapability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Number of capabilities in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns `true` if the set has no capabilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl FromIterator<NetworkCapability> for NetworkCapabilities {
    fn from_iter<I: IntoIterator<Item = NetworkCapability>>(iter: I) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}

/// Immutable description of which networks a registration wants to hear about.
///
/// A network matches when it has every required capability. Selectors are
/// built once through [`NetworkSelector::builder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSelector {
    required: BTreeSet<NetworkCapability>,
}

impl NetworkSelector {
    /// Starts building a selector with no required capabilities.
    #[must_use]
    pub const fn builder() -> SelectorBuilder {
        SelectorBuilder {
            required: BTreeSet::new(),
        }
    }

    /// Selector for general-purpose networks: requires only
    /// [`NetworkCapability::NotRestricted`].
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::builder()
            .add_capability(NetworkCapability::NotRestricted)
            .build()
    }

    /// Returns `true` if a network with `capabilities` satisfies this selector.
    #[must_use]
    pub fn matches(&self, capabilities: &NetworkCapabilities) -> bool {
        self.required.iter().all(|c| capabilities.has(*c))
    }

    /// The capabilities a network must have to match.
    pub fn required_capabilities(&self) -> impl Iterator<Item = NetworkCapability> + '_ {
        self.required.iter().copied()
    }
}

impl fmt::Display for NetworkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NetworkSelector[")?;
        for (i, capability) in self.required.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{capability}")?;
        }
        f.write_str("]")
    }
}

/// Builder for [`NetworkSelector`].
#[derive(Debug, Clone)]
pub struct SelectorBuilder {
    required: BTreeSet<NetworkCapability>,
}

impl SelectorBuilder {
    /// Requires `capability` on matching networks.
    #[must_use]
    pub fn add_capability(mut self, capability: NetworkCapability) -> Self {
        self.required.insert(capability);
        self
    }

    /// Finishes the selector.
    #[must_use]
    pub fn build(self) -> NetworkSelector {
        NetworkSelector {
            required: self.required,
        }
    }
}
