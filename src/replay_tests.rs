//! Tests for scenario replay.

use super::*;
use crate::config::TomlScenario;
use crate::connectivity::{LinkProperties, NetworkCapability, NetworkId};
use std::time::Duration;

fn scenario(content: &str) -> Scenario {
    Scenario::from_toml(&TomlScenario::parse(content).unwrap()).unwrap()
}

fn general() -> crate::connectivity::NetworkCapabilities {
    [NetworkCapability::NotRestricted, NetworkCapability::Internet]
        .into_iter()
        .collect()
}

fn counting() -> (CallbackRef, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let callback = CallbackRef::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, hits)
}

#[tokio::test]
async fn available_link_change_then_stop() {
    let scenario = Scenario {
        service_available: true,
        steps: vec![
            Step::Start,
            Step::Connect {
                network: NetworkId(100),
                capabilities: general(),
            },
            Step::UpdateLinkProperties {
                network: NetworkId(100),
                properties: LinkProperties::new("wlan0", vec![]),
            },
            Step::Stop,
            Step::Disconnect {
                network: NetworkId(100),
            },
        ],
    };
    let (callback, hits) = counting();

    let report = execute(&scenario, callback).await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(report.notifications, 2);
    assert_eq!(report.deliveries, 2);
    assert_eq!(report.steps, 5);
    assert!(!report.watching_at_end);
    assert_eq!(report.registrations_after_teardown, 0);
}

#[tokio::test]
async fn unavailable_service_never_notifies() {
    let scenario = scenario(
        r#"
        service_available = false

        [[step]]
        action = "start"

        [[step]]
        action = "connect"
        network = 1
        capabilities = ["not_restricted"]

        [[step]]
        action = "disconnect"
        network = 1
    "#,
    );
    let (callback, hits) = counting();

    let report = execute(&scenario, callback).await;

    assert!(!report.service_available);
    assert_eq!(report.notifications, 0);
    assert_eq!(report.deliveries, 0);
    assert!(!report.watching_at_end);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn teardown_unregisters_running_session() {
    let scenario = scenario(
        r#"
        [[step]]
        action = "start"

        [[step]]
        action = "connect"
        network = 1
        capabilities = ["not_restricted"]
    "#,
    );
    let (callback, _hits) = counting();

    let report = execute(&scenario, callback).await;

    assert!(report.watching_at_end);
    assert_eq!(report.registrations_after_teardown, 0);
}

#[tokio::test]
async fn start_replays_connected_networks() {
    let scenario = scenario(
        r#"
        [[step]]
        action = "connect"
        network = 1
        capabilities = ["not_restricted"]

        [[step]]
        action = "start"
    "#,
    );
    let (callback, hits) = counting();

    let report = execute(&scenario, callback).await;

    assert_eq!(report.deliveries, 0);
    assert_eq!(report.notifications, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn template_scenario_forwards_three_notifications() {
    let scenario = scenario(&crate::config::scenario_template());
    let (callback, hits) = counting();

    let report = execute(&scenario, callback).await;

    assert_eq!(report.notifications, 3);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(report.steps, 7);
}

#[tokio::test(start_paused = true)]
async fn wait_step_advances_timer() {
    let scenario = Scenario {
        service_available: true,
        steps: vec![Step::Wait(Duration::from_secs(30))],
    };
    let started = tokio::time::Instant::now();

    execute(&scenario, CallbackRef::null()).await;

    assert!(started.elapsed() >= Duration::from_secs(30));
}

#[tokio::test]
async fn channel_callback_receives_every_notification() {
    use tokio_stream::StreamExt;

    let scenario = scenario(&crate::config::scenario_template());
    let (callback, stream) = CallbackRef::channel();

    let report = execute(&scenario, callback).await;
    let received = stream.collect::<Vec<()>>().await.len();

    assert_eq!(received, report.notifications);
}

#[test]
fn report_serializes_to_json() {
    let report = ReplayReport {
        service_available: true,
        steps: 3,
        deliveries: 2,
        notifications: 2,
        watching_at_end: false,
        registrations_after_teardown: 0,
    };

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["notifications"], 2);
    assert_eq!(json["watching_at_end"], false);
}
