//! Observation session: owns the subscription between `start` and `stop`.

use std::fmt;
use std::sync::Arc;

use crate::connectivity::{ConnectivityService, NetworkCallback, NetworkSelector, RegistrationId};

use super::{CallbackRef, ChangeEventCoalescer};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Watches the connectivity service and forwards every relevant change to
/// one registered callback.
///
/// The session is either unsubscribed (initial state, and after
/// [`stop`](Self::stop)) or subscribed (after [`start`](Self::start)).
/// It never holds more than one registration with the service.
///
/// `start` and `stop` are meant to be called from a single control thread.
/// Notifications themselves arrive on threads owned by the service.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use netwatch_bridge::connectivity::{
///     NetworkCapability, NetworkId, SimulatedConnectivityService,
/// };
/// use netwatch_bridge::watch::{CallbackRef, ObservationSession};
///
/// let service = Arc::new(SimulatedConnectivityService::new());
/// let mut session = ObservationSession::new(Some(Arc::clone(&service)));
///
/// session.start(CallbackRef::new(|| println!("interfaces changed")));
/// assert!(session.is_watching());
///
/// service.connect(NetworkId(1), [NetworkCapability::NotRestricted].into_iter().collect());
///
/// session.stop();
/// assert_eq!(service.registration_count(), 0);
/// ```
pub struct ObservationSession<S: ConnectivityService> {
    service: Option<Arc<S>>,
    active: Option<ActiveSubscription>,
}

/// The one live registration a session holds.
struct ActiveSubscription {
    selector: NetworkSelector,
    coalescer: Arc<ChangeEventCoalescer>,
    registration: RegistrationId,
}

impl<S: ConnectivityService> ObservationSession<S> {
    /// Creates an unsubscribed session.
    ///
    /// `None` means the connectivity service is unavailable; the session is
    /// still usable but never delivers notifications.
    #[must_use]
    pub const fn new(service: Option<Arc<S>>) -> Self {
        Self {
            service,
            active: None,
        }
    }

    /// Returns `true` while a subscription is registered.
    #[must_use]
    pub const fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Returns `true` if the session was given a service handle.
    #[must_use]
    pub const fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Selector of the active subscription, if any.
    #[must_use]
    pub fn selector(&self) -> Option<&NetworkSelector> {
        self.active.as_ref().map(|a| &a.selector)
    }

    /// Callback of the active subscription, if any.
    #[must_use]
    pub fn callback(&self) -> Option<&CallbackRef> {
        self.active.as_ref().map(|a| a.coalescer.callback())
    }

    /// Subscribes to connectivity changes on unrestricted networks and
    /// forwards each one to `callback`.
    ///
    /// Without a service handle this logs one error and returns without
    /// subscribing. Starting an already subscribed session stops the prior
    /// subscription first, so the old callback receives nothing further.
    pub fn start(&mut self, callback: CallbackRef) {
        let Some(service) = self.service.as_ref() else {
            tracing::error!(
                "Connectivity service unavailable; interface changes will not be reported"
            );
            return;
        };

        if let Some(previous) = self.active.take() {
            tracing::debug!("Replacing active subscription {}", previous.registration);
            service.unregister_network_callback(previous.registration);
        }

        let selector = NetworkSelector::unrestricted();
        let coalescer = Arc::new(ChangeEventCoalescer::new(callback));
        let registration = service.register_network_callback(
            &selector,
            Arc::clone(&coalescer) as Arc<dyn NetworkCallback>,
        );
        tracing::debug!("Started interface watch ({registration}, {selector})");

        self.active = Some(ActiveSubscription {
            selector,
            coalescer,
            registration,
        });
    }

    /// Unregisters the active subscription.
    ///
    /// A no-op when unsubscribed; safe to call any number of times.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(service) = self.service.as_ref() {
            service.unregister_network_callback(active.registration);
        }
        tracing::debug!("Stopped interface watch ({})", active.registration);
    }
}

impl<S: ConnectivityService> Drop for ObservationSession<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: ConnectivityService> fmt::Debug for ObservationSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationSession")
            .field("has_service", &self.has_service())
            .field("registration", &self.active.as_ref().map(|a| a.registration))
            .finish_non_exhaustive()
    }
}
