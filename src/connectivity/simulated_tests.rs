//! Tests for the simulated connectivity service.

use super::*;
use std::sync::{Arc, Mutex};

/// Callback that records every event it receives.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(EventKind, NetworkId)>>,
}

impl Recorder {
    fn events(&self) -> Vec<(EventKind, NetworkId)> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, kind: EventKind, network: NetworkId) {
        self.events.lock().unwrap().push((kind, network));
    }
}

impl NetworkCallback for Recorder {
    fn on_available(&self, network: NetworkId) {
        self.push(EventKind::Available, network);
    }

    fn on_lost(&self, network: NetworkId) {
        self.push(EventKind::Lost, network);
    }

    fn on_capabilities_changed(&self, network: NetworkId, _: &NetworkCapabilities) {
        self.push(EventKind::CapabilitiesChanged, network);
    }

    fn on_link_properties_changed(&self, network: NetworkId, _: &LinkProperties) {
        self.push(EventKind::LinkPropertiesChanged, network);
    }
}

fn general() -> NetworkCapabilities {
    [NetworkCapability::NotRestricted, NetworkCapability::Internet]
        .into_iter()
        .collect()
}

fn restricted() -> NetworkCapabilities {
    [NetworkCapability::Internet].into_iter().collect()
}

fn register(service: &SimulatedConnectivityService) -> (Arc<Recorder>, RegistrationId) {
    let recorder = Arc::new(Recorder::default());
    let id = service.register_network_callback(
        &NetworkSelector::unrestricted(),
        Arc::clone(&recorder) as Arc<dyn NetworkCallback>,
    );
    (recorder, id)
}

mod registration {
    use super::*;

    #[test]
    fn register_and_unregister_track_count() {
        let service = SimulatedConnectivityService::new();
        let (_recorder, id) = register(&service);
        assert_eq!(service.registration_count(), 1);

        service.unregister_network_callback(id);
        assert_eq!(service.registration_count(), 0);
    }

    #[test]
    fn registration_ids_are_unique() {
        let service = SimulatedConnectivityService::new();
        let (_a, first) = register(&service);
        let (_b, second) = register(&service);

        assert_ne!(first, second);
        assert_eq!(service.registration_count(), 2);
    }

    #[test]
    fn unregister_unknown_id_is_ignored() {
        let service = SimulatedConnectivityService::new();
        let (_recorder, _id) = register(&service);

        service.unregister_network_callback(RegistrationId(999));

        assert_eq!(service.registration_count(), 1);
    }

    #[test]
    fn selectors_reports_registered_selector() {
        let service = SimulatedConnectivityService::new();
        let (_recorder, _id) = register(&service);

        assert_eq!(service.selectors(), vec![NetworkSelector::unrestricted()]);
    }

    #[test]
    fn registration_replays_matching_connected_networks() {
        let service = SimulatedConnectivityService::new();
        service.connect(NetworkId(1), general());
        service.connect(NetworkId(2), restricted());

        let (recorder, _id) = register(&service);

        assert_eq!(recorder.events(), vec![(EventKind::Available, NetworkId(1))]);
    }

    #[test]
    fn unregistered_callback_receives_nothing() {
        let service = SimulatedConnectivityService::new();
        let (recorder, id) = register(&service);
        service.unregister_network_callback(id);

        let delivered = service.connect(NetworkId(1), general());

        assert_eq!(delivered, 0);
        assert!(recorder.events().is_empty());
    }
}

mod delivery {
    use super::*;

    #[test]
    fn connect_delivers_available_to_matching() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);

        let delivered = service.connect(NetworkId(5), general());

        assert_eq!(delivered, 1);
        assert_eq!(recorder.events(), vec![(EventKind::Available, NetworkId(5))]);
        assert_eq!(service.connected_networks(), vec![NetworkId(5)]);
    }

    #[test]
    fn connect_restricted_network_is_filtered() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);

        let delivered = service.connect(NetworkId(5), restricted());

        assert_eq!(delivered, 0);
        assert!(recorder.events().is_empty());
        assert_eq!(service.connected_networks(), vec![NetworkId(5)]);
    }

    #[test]
    fn link_properties_delivered_for_matching_network() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(5), general());

        let props = LinkProperties::new("wlan0", vec!["192.168.1.20".parse().unwrap()]);
        let delivered = service.update_link_properties(NetworkId(5), props);

        assert_eq!(delivered, 1);
        assert_eq!(
            recorder.events().last(),
            Some(&(EventKind::LinkPropertiesChanged, NetworkId(5)))
        );
    }

    #[test]
    fn disconnect_delivers_lost() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(5), general());

        let delivered = service.disconnect(NetworkId(5));

        assert_eq!(delivered, 1);
        assert_eq!(
            recorder.events().last(),
            Some(&(EventKind::Lost, NetworkId(5)))
        );
        assert!(service.connected_networks().is_empty());
    }

    #[test]
    fn unknown_network_events_deliver_nothing() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);

        assert_eq!(service.disconnect(NetworkId(9)), 0);
        assert_eq!(service.update_capabilities(NetworkId(9), general()), 0);
        assert_eq!(
            service.update_link_properties(NetworkId(9), LinkProperties::default()),
            0
        );
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn every_matching_registration_receives_event() {
        let service = SimulatedConnectivityService::new();
        let (first, _a) = register(&service);
        let (second, _b) = register(&service);

        let delivered = service.connect(NetworkId(1), general());

        assert_eq!(delivered, 2);
        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events().len(), 1);
    }
}

mod capability_transitions {
    use super::*;

    #[test]
    fn still_matching_yields_capabilities_changed() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(1), general());

        let mut updated: Vec<_> = general().iter().collect();
        updated.push(NetworkCapability::Validated);
        service.update_capabilities(NetworkId(1), updated.into_iter().collect());

        assert_eq!(
            recorder.events(),
            vec![
                (EventKind::Available, NetworkId(1)),
                (EventKind::CapabilitiesChanged, NetworkId(1)),
            ]
        );
    }

    #[test]
    fn becoming_unrestricted_yields_available() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(1), restricted());

        service.update_capabilities(NetworkId(1), general());

        assert_eq!(recorder.events(), vec![(EventKind::Available, NetworkId(1))]);
    }

    #[test]
    fn becoming_restricted_yields_lost() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(1), general());

        service.update_capabilities(NetworkId(1), restricted());

        assert_eq!(
            recorder.events(),
            vec![
                (EventKind::Available, NetworkId(1)),
                (EventKind::Lost, NetworkId(1)),
            ]
        );
    }

    #[test]
    fn reconnect_known_network_acts_as_update() {
        let service = SimulatedConnectivityService::new();
        let (recorder, _id) = register(&service);
        service.connect(NetworkId(1), general());

        service.connect(NetworkId(1), general());

        assert_eq!(
            recorder.events().last(),
            Some(&(EventKind::CapabilitiesChanged, NetworkId(1)))
        );
        assert_eq!(service.connected_networks().len(), 1);
    }
}

mod reentrancy {
    use super::*;
    use std::sync::OnceLock;

    /// Callback that unregisters itself on the first event it sees.
    struct SelfRemoving {
        service: Arc<SimulatedConnectivityService>,
        id: OnceLock<RegistrationId>,
        seen: Mutex<usize>,
    }

    impl SelfRemoving {
        fn hit(&self) {
            *self.seen.lock().unwrap() += 1;
            if let Some(id) = self.id.get() {
                self.service.unregister_network_callback(*id);
            }
        }
    }

    impl NetworkCallback for SelfRemoving {
        fn on_available(&self, _: NetworkId) {
            self.hit();
        }

        fn on_lost(&self, _: NetworkId) {
            self.hit();
        }

        fn on_capabilities_changed(&self, _: NetworkId, _: &NetworkCapabilities) {
            self.hit();
        }

        fn on_link_properties_changed(&self, _: NetworkId, _: &LinkProperties) {
            self.hit();
        }
    }

    #[test]
    fn callback_may_unregister_itself() {
        let service = Arc::new(SimulatedConnectivityService::new());
        let callback = Arc::new(SelfRemoving {
            service: Arc::clone(&service),
            id: OnceLock::new(),
            seen: Mutex::new(0),
        });
        let id = service.register_network_callback(
            &NetworkSelector::unrestricted(),
            Arc::clone(&callback) as Arc<dyn NetworkCallback>,
        );
        callback.id.set(id).unwrap();

        service.connect(NetworkId(1), general());
        service.disconnect(NetworkId(1));

        assert_eq!(*callback.seen.lock().unwrap(), 1);
        assert_eq!(service.registration_count(), 0);
    }
}

#[test]
fn debug_format_reports_counts() {
    let service = SimulatedConnectivityService::new();
    let (_recorder, _id) = register(&service);

    let debug_str = format!("{service:?}");

    assert!(debug_str.contains("SimulatedConnectivityService"));
    assert!(debug_str.contains("registrations: 1"));
}
