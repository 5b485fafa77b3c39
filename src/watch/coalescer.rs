//! Collapses the four connectivity event kinds into one notification.

use crate::connectivity::{
    EventKind, LinkProperties, NetworkCallback, NetworkCapabilities, NetworkId,
};

use super::CallbackRef;

/// The callback object registered with the connectivity service.
///
/// Every event kind maps to the same outbound action: invoke the stored
/// [`CallbackRef`] once, synchronously, with no payload. Events are
/// forwarded in the order the service delivers them, with no batching and
/// no suppression of repeats. Consumers re-query interface state themselves.
#[derive(Debug, Clone)]
pub struct ChangeEventCoalescer {
    callback: CallbackRef,
}

impl ChangeEventCoalescer {
    /// Creates a coalescer that forwards to `callback`.
    #[must_use]
    pub const fn new(callback: CallbackRef) -> Self {
        Self { callback }
    }

    /// Returns the callback this coalescer forwards to.
    #[must_use]
    pub const fn callback(&self) -> &CallbackRef {
        &self.callback
    }

    fn dispatch(&self, kind: EventKind, network: NetworkId) {
        tracing::trace!("Forwarding {kind} for {network}");
        match kind {
            EventKind::Available
            | EventKind::Lost
            | EventKind::CapabilitiesChanged
            | EventKind::LinkPropertiesChanged => self.callback.invoke(),
        }
    }
}

impl NetworkCallback for ChangeEventCoalescer {
    fn on_available(&self, network: NetworkId) {
        self.dispatch(EventKind::Available, network);
    }

    fn on_lost(&self, network: NetworkId) {
        self.dispatch(EventKind::Lost, network);
    }

    fn on_capabilities_changed(&self, network: NetworkId, _capabilities: &NetworkCapabilities) {
        self.dispatch(EventKind::CapabilitiesChanged, network);
    }

    fn on_link_properties_changed(&self, network: NetworkId, _properties: &LinkProperties) {
        self.dispatch(EventKind::LinkPropertiesChanged, network);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{ConnectivityEvent, NetworkCapability};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting() -> (ChangeEventCoalescer, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let coalescer = ChangeEventCoalescer::new(CallbackRef::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        (coalescer, hits)
    }

    #[test]
    fn available_forwards_once() {
        let (coalescer, hits) = counting();
        coalescer.on_available(NetworkId(1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lost_forwards_once() {
        let (coalescer, hits) = counting();
        coalescer.on_lost(NetworkId(1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capabilities_changed_forwards_once() {
        let (coalescer, hits) = counting();
        let caps: NetworkCapabilities = [NetworkCapability::Validated].into_iter().collect();
        coalescer.on_capabilities_changed(NetworkId(1), &caps);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn link_properties_changed_forwards_once() {
        let (coalescer, hits) = counting();
        coalescer.on_link_properties_changed(NetworkId(1), &LinkProperties::new("eth0", vec![]));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rapid_repeats_are_not_suppressed() {
        let (coalescer, hits) = counting();
        for _ in 0..5 {
            coalescer.on_available(NetworkId(1));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn forwards_in_delivery_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&order);
        let current = Arc::new(Mutex::new(EventKind::Available));
        let reader = Arc::clone(&current);
        let coalescer = ChangeEventCoalescer::new(CallbackRef::new(move || {
            sink.lock().unwrap().push(*reader.lock().unwrap());
        }));

        let events = [
            ConnectivityEvent::LinkPropertiesChanged {
                network: NetworkId(2),
                properties: LinkProperties::default(),
            },
            ConnectivityEvent::Available {
                network: NetworkId(1),
            },
            ConnectivityEvent::Lost {
                network: NetworkId(2),
            },
        ];
        for event in &events {
            *current.lock().unwrap() = event.kind();
            event.deliver_to(&coalescer);
        }

        assert_eq!(
            *order.lock().unwrap(),
            vec![
                EventKind::LinkPropertiesChanged,
                EventKind::Available,
                EventKind::Lost,
            ]
        );
    }

    #[test]
    fn null_callback_is_harmless() {
        let coalescer = ChangeEventCoalescer::new(CallbackRef::null());
        coalescer.on_available(NetworkId(1));
        assert!(coalescer.callback().is_null());
    }
}
