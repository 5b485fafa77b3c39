//! Connectivity service boundary.
//!
//! This module describes the platform connectivity service the bridge talks to:
//! - Network capabilities and selectors ([`NetworkCapability`], [`NetworkSelector`])
//! - The four event kinds the service reports ([`ConnectivityEvent`], [`EventKind`])
//! - The callback object registered with the service ([`NetworkCallback`])
//! - The service itself ([`ConnectivityService`])
//! - An in-process implementation ([`SimulatedConnectivityService`])

mod capability;
mod event;
mod service;
mod simulated;

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod simulated_tests;

pub use capability::{NetworkCapabilities, NetworkCapability, NetworkSelector, SelectorBuilder};
pub use event::{ConnectivityEvent, EventKind, LinkProperties, NetworkCallback, NetworkId};
pub use service::{ConnectivityService, RegistrationId};
pub use simulated::SimulatedConnectivityService;
