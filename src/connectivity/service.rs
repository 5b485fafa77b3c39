//! Connectivity service trait.

use std::fmt;
use std::sync::Arc;

use super::{NetworkCallback, NetworkSelector};

/// Token identifying one callback registration with a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(pub u64);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration#{}", self.0)
    }
}

/// The platform connectivity service.
///
/// The service owns the threads that deliver callbacks. Registration and
/// unregistration are local bookkeeping: they never block and never fail
/// once a service handle exists.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use netwatch_bridge::connectivity::{
///     ConnectivityService, NetworkSelector, SimulatedConnectivityService,
/// };
/// use netwatch_bridge::watch::{CallbackRef, ChangeEventCoalescer};
///
/// let service = SimulatedConnectivityService::new();
/// let coalescer = Arc::new(ChangeEventCoalescer::new(CallbackRef::new(|| {})));
///
/// let id = service.register_network_callback(&NetworkSelector::unrestricted(), coalescer);
/// assert_eq!(service.registration_count(), 1);
///
/// service.unregister_network_callback(id);
/// assert_eq!(service.registration_count(), 0);
/// ```
pub trait ConnectivityService: Send + Sync {
    /// Registers `callback` for events on networks matching `selector`.
    fn register_network_callback(
        &self,
        selector: &NetworkSelector,
        callback: Arc<dyn NetworkCallback>,
    ) -> RegistrationId;

    /// Removes a registration. Unknown ids are ignored.
    ///
    /// Deliveries that start after this returns never reach the
    /// registration's callback. A delivery already in flight on another
    /// thread may still complete.
    fn unregister_network_callback(&self, registration: RegistrationId);
}
