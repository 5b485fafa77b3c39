//! Connectivity events and the callback interface that receives them.

use std::fmt;
use std::net::IpAddr;

use super::NetworkCapabilities;

/// Opaque identity of a network as assigned by the connectivity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(pub u64);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network#{}", self.0)
    }
}

/// Link-layer properties of a network.
///
/// Delivered as payload with [`EventKind::LinkPropertiesChanged`].
/// The bridge forwards the event but never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkProperties {
    /// Name of the interface carrying the network (e.g. `wlan0`).
    pub interface_name: String,
    /// Addresses currently assigned on the link.
    pub addresses: Vec<IpAddr>,
}

impl LinkProperties {
    /// Creates link properties for `interface_name` with `addresses`.
    #[must_use]
    pub fn new(interface_name: impl Into<String>, addresses: Vec<IpAddr>) -> Self {
        Self {
            interface_name: interface_name.into(),
            addresses,
        }
    }
}

/// The kind of a connectivity event, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A matching network became available.
    Available,
    /// A matching network was lost.
    Lost,
    /// A matching network's capabilities changed.
    CapabilitiesChanged,
    /// A matching network's link properties changed.
    LinkPropertiesChanged,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "available",
            Self::Lost => "lost",
            Self::CapabilitiesChanged => "capabilities-changed",
            Self::LinkPropertiesChanged => "link-properties-changed",
        };
        f.write_str(name)
    }
}

/// A single event reported by the connectivity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// A network became available.
    Available {
        /// The network.
        network: NetworkId,
    },
    /// A network was lost.
    Lost {
        /// The network.
        network: NetworkId,
    },
    /// A network's capabilities changed.
    CapabilitiesChanged {
        /// The network.
        network: NetworkId,
        /// Capabilities after the change.
        capabilities: NetworkCapabilities,
    },
    /// A network's link properties changed.
    LinkPropertiesChanged {
        /// The network.
        network: NetworkId,
        /// Link properties after the change.
        properties: LinkProperties,
    },
}

impl ConnectivityEvent {
    /// Returns the payload-free kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Available { .. } => EventKind::Available,
            Self::Lost { .. } => EventKind::Lost,
            Self::CapabilitiesChanged { .. } => EventKind::CapabilitiesChanged,
            Self::LinkPropertiesChanged { .. } => EventKind::LinkPropertiesChanged,
        }
    }

    /// Returns the network this event is about.
    #[must_use]
    pub const fn network(&self) -> NetworkId {
        match self {
            Self::Available { network }
            | Self::Lost { network }
            | Self::CapabilitiesChanged { network, .. }
            | Self::LinkPropertiesChanged { network, .. } => *network,
        }
    }

    /// Invokes the [`NetworkCallback`] method corresponding to this event.
    pub fn deliver_to(&self, callback: &dyn NetworkCallback) {
        match self {
            Self::Available { network } => callback.on_available(*network),
            Self::Lost { network } => callback.on_lost(*network),
            Self::CapabilitiesChanged {
                network,
                capabilities,
            } => callback.on_capabilities_changed(*network, capabilities),
            Self::LinkPropertiesChanged {
                network,
                properties,
            } => callback.on_link_properties_changed(*network, properties),
        }
    }
}

/// Callback object registered with a [`ConnectivityService`](super::ConnectivityService).
///
/// The service may call these methods from threads it owns, concurrently
/// for different networks. Implementations must be cheap and non-blocking.
pub trait NetworkCallback: Send + Sync {
    /// A network matching the registration's selector became available.
    fn on_available(&self, network: NetworkId);

    /// A previously matching network was lost.
    fn on_lost(&self, network: NetworkId);

    /// A matching network's capabilities changed.
    fn on_capabilities_changed(&self, network: NetworkId, capabilities: &NetworkCapabilities);

    /// A matching network's link properties changed.
    fn on_link_properties_changed(&self, network: NetworkId, properties: &LinkProperties);
}
