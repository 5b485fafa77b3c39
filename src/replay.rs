//! Scenario replay.
//!
//! Applies a validated [`Scenario`] to a [`SimulatedConnectivityService`]
//! while an [`ObservationSession`] watches it, and reports what the
//! session forwarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::config::{Scenario, Step};
use crate::connectivity::SimulatedConnectivityService;
use crate::watch::{CallbackRef, ObservationSession};

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Whether the session was given a connectivity service.
    pub service_available: bool,
    /// Steps applied.
    pub steps: usize,
    /// Callback deliveries caused by network steps. Replays of connected
    /// networks on registration are not counted.
    pub deliveries: usize,
    /// Notifications forwarded to the caller's callback.
    pub notifications: usize,
    /// Whether the session was still subscribed after the last step.
    pub watching_at_end: bool,
    /// Registrations left on the service after the session was dropped.
    pub registrations_after_teardown: usize,
}

/// Replays `scenario`, forwarding every notification to `callback`.
///
/// `wait` steps sleep on the tokio timer. The session is dropped at the end,
/// which unregisters any subscription still active.
pub async fn execute(scenario: &Scenario, callback: CallbackRef) -> ReplayReport {
    let service = Arc::new(SimulatedConnectivityService::new());
    let handle = scenario.service_available.then(|| Arc::clone(&service));
    let mut session = ObservationSession::new(handle);

    let forwarded = Arc::new(AtomicUsize::new(0));
    let counting = {
        let forwarded = Arc::clone(&forwarded);
        CallbackRef::new(move || {
            forwarded.fetch_add(1, Ordering::SeqCst);
            callback.invoke();
        })
    };

    let mut deliveries = 0;
    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("Step {}: {step}", index + 1);
        deliveries += apply(step, &service, &mut session, &counting).await;
    }

    let watching_at_end = session.is_watching();
    drop(session);

    ReplayReport {
        service_available: scenario.service_available,
        steps: scenario.steps.len(),
        deliveries,
        notifications: forwarded.load(Ordering::SeqCst),
        watching_at_end,
        registrations_after_teardown: service.registration_count(),
    }
}

/// Applies one step and returns the number of service deliveries it caused.
async fn apply(
    step: &Step,
    service: &SimulatedConnectivityService,
    session: &mut ObservationSession<SimulatedConnectivityService>,
    callback: &CallbackRef,
) -> usize {
    match step {
        Step::Start => {
            session.start(callback.clone());
            0
        }
        Step::Stop => {
            session.stop();
            0
        }
        Step::Connect {
            network,
            capabilities,
        } => service.connect(*network, capabilities.clone()),
        Step::UpdateCapabilities {
            network,
            capabilities,
        } => service.update_capabilities(*network, capabilities.clone()),
        Step::UpdateLinkProperties {
            network,
            properties,
        } => service.update_link_properties(*network, properties.clone()),
        Step::Disconnect { network } => service.disconnect(*network),
        Step::Wait(duration) => {
            tokio::time::sleep(*duration).await;
            0
        }
    }
}
