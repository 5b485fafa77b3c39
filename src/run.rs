//! Application execution logic.
//!
//! This module runs a validated scenario through the replay engine while a
//! separate task consumes the forwarded notifications.

use thiserror::Error;
use tokio_stream::StreamExt;

use netwatch_bridge::config::ValidatedConfig;
use netwatch_bridge::replay::{self, ReplayReport};
use netwatch_bridge::watch::{CallbackRef, ChangeStream};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The notification consumer task failed.
    #[error("Notification consumer failed: {0}")]
    Consumer(#[source] tokio::task::JoinError),

    /// Failed to serialize the report.
    #[error("Failed to serialize report: {0}")]
    Report(#[source] serde_json::Error),
}

/// Executes the replay.
///
/// This function:
/// 1. Creates a notification channel and spawns its consumer
/// 2. Replays every scenario step
/// 3. Waits for the consumer to drain the channel
/// 4. Prints the report
///
/// # Errors
///
/// Returns an error if the consumer task panics or the report cannot be
/// serialized.
pub async fn execute(config: &ValidatedConfig) -> Result<(), RunError> {
    if !config.scenario.service_available {
        tracing::info!("Replaying without a connectivity service");
    }

    let (callback, stream) = CallbackRef::channel();
    let consumer = tokio::spawn(consume(stream));

    let report = replay::execute(&config.scenario, callback).await;
    let received = consumer.await.map_err(RunError::Consumer)?;
    tracing::debug!("Consumer received {received} notification(s)");

    println!("{}", render_report(&report, config.json)?);
    Ok(())
}

/// Logs each notification and returns how many arrived.
///
/// Ends when the replay has released every copy of the callback.
async fn consume(mut stream: ChangeStream) -> usize {
    let mut received = 0;
    while stream.next().await.is_some() {
        received += 1;
        tracing::info!("Interfaces may have changed (notification #{received})");
    }
    received
}

/// Formats the report as pretty JSON or a one-line summary.
fn render_report(report: &ReplayReport, json: bool) -> Result<String, RunError> {
    if json {
        return serde_json::to_string_pretty(report).map_err(RunError::Report);
    }

    Ok(format!(
        "Replayed {} step(s): {} notification(s) forwarded, {} service deliveries, \
         watching at end: {}, registrations after teardown: {}",
        report.steps,
        report.notifications,
        report.deliveries,
        if report.watching_at_end { "yes" } else { "no" },
        report.registrations_after_teardown,
    ))
}
