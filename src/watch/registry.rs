//! Fan-out of one observation session to many in-process watchers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::connectivity::ConnectivityService;

use super::{CallbackRef, ObservationSession};

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

type WatcherId = u64;
type Watcher = Arc<dyn Fn() + Send + Sync>;

/// Shares one [`ObservationSession`] between any number of watchers.
///
/// The first [`watch`](Self::watch) starts the session; dropping the last
/// [`WatchHandle`] stops it. Every notification is delivered once to each
/// watcher registered at the time it arrives.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use netwatch_bridge::connectivity::{
///     NetworkCapability, NetworkId, SimulatedConnectivityService,
/// };
/// use netwatch_bridge::watch::WatcherRegistry;
///
/// let service = Arc::new(SimulatedConnectivityService::new());
/// let registry = WatcherRegistry::new(Some(Arc::clone(&service)));
///
/// let handle = registry.watch(|| println!("interfaces changed"));
/// assert_eq!(service.registration_count(), 1);
///
/// drop(handle);
/// assert_eq!(service.registration_count(), 0);
/// ```
pub struct WatcherRegistry<S: ConnectivityService> {
    // Lock order: `lifecycle` before `watchers`. Neither is held while the
    // session starts or stops.
    lifecycle: Mutex<Lifecycle<S>>,
    watchers: Arc<Mutex<WatcherTable>>,
    has_service: bool,
}

struct Lifecycle<S: ConnectivityService> {
    // `None` while a thread has the session checked out to start or stop it.
    session: Option<ObservationSession<S>>,
    running: bool,
}

#[derive(Default)]
struct WatcherTable {
    next_id: WatcherId,
    entries: BTreeMap<WatcherId, Watcher>,
}

impl<S: ConnectivityService + 'static> WatcherRegistry<S> {
    /// Creates a registry over the given service handle.
    #[must_use]
    pub fn new(service: Option<Arc<S>>) -> Arc<Self> {
        let has_service = service.is_some();
        Arc::new(Self {
            lifecycle: Mutex::new(Lifecycle {
                session: Some(ObservationSession::new(service)),
                running: false,
            }),
            watchers: Arc::new(Mutex::new(WatcherTable::default())),
            has_service,
        })
    }

    /// Adds a watcher. The watch lasts until the returned handle is dropped.
    ///
    /// Watchers may call back into the registry, including while the first
    /// watch is still starting the session.
    pub fn watch<F>(self: &Arc<Self>, watcher: F) -> WatchHandle<S>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = {
            let mut table = lock(&self.watchers);
            table.next_id += 1;
            let id = table.next_id;
            table.entries.insert(id, Arc::new(watcher));
            id
        };
        self.sync_session();

        WatchHandle {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Number of live watchers.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        lock(&self.watchers).entries.len()
    }

    /// Returns `true` while the underlying session is subscribed.
    ///
    /// During a start or stop in progress this reports the state being
    /// moved to.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        let lifecycle = self.lock_lifecycle();
        lifecycle.session.as_ref().map_or(
            lifecycle.running && self.has_service,
            ObservationSession::is_watching,
        )
    }

    fn remove(&self, id: WatcherId) {
        lock(&self.watchers).entries.remove(&id);
        self.sync_session();
    }

    /// Starts or stops the session until it matches the watcher table.
    ///
    /// Returns at once if another call has the session checked out; that
    /// call re-reads the table before handing the session back.
    fn sync_session(&self) {
        let mut lifecycle = self.lock_lifecycle();
        let Some(mut session) = lifecycle.session.take() else {
            return;
        };

        loop {
            let wanted = !lock(&self.watchers).entries.is_empty();
            if wanted == lifecycle.running {
                lifecycle.session = Some(session);
                return;
            }
            lifecycle.running = wanted;
            drop(lifecycle);

            if wanted {
                tracing::debug!("First watcher added, starting session");
                session.start(self.fan_out());
            } else {
                tracing::debug!("Last watcher removed, stopping session");
                session.stop();
            }

            lifecycle = self.lock_lifecycle();
        }
    }

    /// Callback handed to the session: notifies every current watcher.
    fn fan_out(&self) -> CallbackRef {
        let watchers = Arc::clone(&self.watchers);
        CallbackRef::new(move || {
            let targets: Vec<Watcher> = lock(&watchers).entries.values().cloned().collect();
            for target in targets {
                target();
            }
        })
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle<S>> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(table: &Mutex<WatcherTable>) -> MutexGuard<'_, WatcherTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: ConnectivityService> fmt::Debug for WatcherRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherRegistry")
            .field("watchers", &lock(&self.watchers).entries.len())
            .finish_non_exhaustive()
    }
}

/// Keeps a watcher registered; dropping it removes the watcher.
#[must_use = "dropping the handle immediately removes the watcher"]
pub struct WatchHandle<S: ConnectivityService + 'static> {
    registry: Arc<WatcherRegistry<S>>,
    id: WatcherId,
}

impl<S: ConnectivityService + 'static> Drop for WatchHandle<S> {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

impl<S: ConnectivityService + 'static> fmt::Debug for WatchHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").field("id", &self.id).finish()
    }
}
