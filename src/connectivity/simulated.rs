//! In-process connectivity service.
//!
//! [`SimulatedConnectivityService`] keeps a table of connected networks and
//! callback registrations, and delivers events the way the platform service
//! does: per registration, filtered by the registration's selector.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    ConnectivityEvent, ConnectivityService, LinkProperties, NetworkCallback, NetworkCapabilities,
    NetworkId, NetworkSelector, RegistrationId,
};

/// A connectivity service that lives entirely in the current process.
///
/// Network state changes are driven explicitly through [`connect`](Self::connect),
/// [`update_capabilities`](Self::update_capabilities),
/// [`update_link_properties`](Self::update_link_properties) and
/// [`disconnect`](Self::disconnect). Each returns the number of callback
/// deliveries it made.
///
/// Callbacks run on the calling thread after the internal lock is released,
/// so a callback may register or unregister without deadlocking.
#[derive(Default)]
pub struct SimulatedConnectivityService {
    state: Mutex<ServiceState>,
}

#[derive(Default)]
struct ServiceState {
    next_registration: u64,
    registrations: BTreeMap<RegistrationId, Registration>,
    networks: BTreeMap<NetworkId, NetworkCapabilities>,
}

struct Registration {
    selector: NetworkSelector,
    callback: Arc<dyn NetworkCallback>,
}

/// One pending callback invocation, collected under the lock and run after it.
type Delivery = (Arc<dyn NetworkCallback>, ConnectivityEvent);

impl std::fmt::Debug for SimulatedConnectivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SimulatedConnectivityService")
            .field("registrations", &state.registrations.len())
            .field("networks", &state.networks.len())
            .finish_non_exhaustive()
    }
}

impl SimulatedConnectivityService {
    /// Creates a service with no networks and no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active callback registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.lock().registrations.len()
    }

    /// Selectors of the active registrations, in registration order.
    #[must_use]
    pub fn selectors(&self) -> Vec<NetworkSelector> {
        self.lock()
            .registrations
            .values()
            .map(|r| r.selector.clone())
            .collect()
    }

    /// Currently connected networks, ordered by id.
    #[must_use]
    pub fn connected_networks(&self) -> Vec<NetworkId> {
        self.lock().networks.keys().copied().collect()
    }

    /// Brings `network` up with `capabilities`.
    ///
    /// Registrations whose selector matches receive `on_available`.
    /// Connecting an already known network behaves like
    /// [`update_capabilities`](Self::update_capabilities).
    pub fn connect(&self, network: NetworkId, capabilities: NetworkCapabilities) -> usize {
        let deliveries = {
            let mut state = self.lock();
            if state.networks.contains_key(&network) {
                state.capability_change(network, capabilities)
            } else {
                let deliveries =
                    state.matching(&capabilities, || ConnectivityEvent::Available { network });
                state.networks.insert(network, capabilities);
                deliveries
            }
        };
        deliver(deliveries)
    }

    /// Replaces the capabilities of a connected network.
    ///
    /// For each registration: still matching yields `on_capabilities_changed`,
    /// newly matching yields `on_available`, no longer matching yields
    /// `on_lost`. Unknown networks deliver nothing.
    pub fn update_capabilities(
        &self,
        network: NetworkId,
        capabilities: NetworkCapabilities,
    ) -> usize {
        let deliveries = {
            let mut state = self.lock();
            if !state.networks.contains_key(&network) {
                tracing::debug!("Ignoring capability update for unknown {network}");
                return 0;
            }
            state.capability_change(network, capabilities)
        };
        deliver(deliveries)
    }

    /// Reports new link properties for a connected network.
    ///
    /// Unknown networks deliver nothing.
    pub fn update_link_properties(
        &self,
        network: NetworkId,
        properties: LinkProperties,
    ) -> usize {
        let deliveries = {
            let state = self.lock();
            let Some(capabilities) = state.networks.get(&network) else {
                tracing::debug!("Ignoring link properties for unknown {network}");
                return 0;
            };
            state.matching(capabilities, || ConnectivityEvent::LinkPropertiesChanged {
                network,
                properties: properties.clone(),
            })
        };
        deliver(deliveries)
    }

    /// Takes `network` down.
    ///
    /// Registrations that matched its last known capabilities receive
    /// `on_lost`. Unknown networks deliver nothing.
    pub fn disconnect(&self, network: NetworkId) -> usize {
        let deliveries = {
            let mut state = self.lock();
            let Some(capabilities) = state.networks.remove(&network) else {
                tracing::debug!("Ignoring disconnect for unknown {network}");
                return 0;
            };
            state.matching(&capabilities, || ConnectivityEvent::Lost { network })
        };
        deliver(deliveries)
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        // Every mutation leaves the tables consistent before any callback runs.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ServiceState {
    /// Builds one delivery per registration matching `capabilities`.
    fn matching(
        &self,
        capabilities: &NetworkCapabilities,
        event: impl Fn() -> ConnectivityEvent,
    ) -> Vec<Delivery> {
        self.registrations
            .values()
            .filter(|r| r.selector.matches(capabilities))
            .map(|r| (Arc::clone(&r.callback), event()))
            .collect()
    }

    fn capability_change(
        &mut self,
        network: NetworkId,
        capabilities: NetworkCapabilities,
    ) -> Vec<Delivery> {
        let previous = self
            .networks
            .insert(network, capabilities.clone())
            .unwrap_or_default();

        self.registrations
            .values()
            .filter_map(|r| {
                let event = match (
                    r.selector.matches(&previous),
                    r.selector.matches(&capabilities),
                ) {
                    (true, true) => ConnectivityEvent::CapabilitiesChanged {
                        network,
                        capabilities: capabilities.clone(),
                    },
                    (false, true) => ConnectivityEvent::Available { network },
                    (true, false) => ConnectivityEvent::Lost { network },
                    (false, false) => return None,
                };
                Some((Arc::clone(&r.callback), event))
            })
            .collect()
    }
}

fn deliver(deliveries: Vec<Delivery>) -> usize {
    let count = deliveries.len();
    for (callback, event) in deliveries {
        tracing::trace!("Delivering {} for {}", event.kind(), event.network());
        event.deliver_to(callback.as_ref());
    }
    count
}

impl ConnectivityService for SimulatedConnectivityService {
    /// Registers `callback` and replays `on_available` for every connected
    /// network the selector matches.
    fn register_network_callback(
        &self,
        selector: &NetworkSelector,
        callback: Arc<dyn NetworkCallback>,
    ) -> RegistrationId {
        let (id, replay) = {
            let mut state = self.lock();
            state.next_registration += 1;
            let id = RegistrationId(state.next_registration);

            let replay: Vec<Delivery> = state
                .networks
                .iter()
                .filter(|(_, caps)| selector.matches(caps))
                .map(|(network, _)| {
                    (
                        Arc::clone(&callback),
                        ConnectivityEvent::Available { network: *network },
                    )
                })
                .collect();

            state.registrations.insert(
                id,
                Registration {
                    selector: selector.clone(),
                    callback,
                },
            );
            (id, replay)
        };

        tracing::debug!("Registered {id} with {selector}");
        deliver(replay);
        id
    }

    fn unregister_network_callback(&self, registration: RegistrationId) {
        if self.lock().registrations.remove(&registration).is_some() {
            tracing::debug!("Unregistered {registration}");
        }
    }
}
