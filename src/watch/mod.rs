//! The interface watch bridge.
//!
//! This module provides:
//! - The opaque outbound callback ([`CallbackRef`], [`NativeCallback`])
//! - Event-kind erasure ([`ChangeEventCoalescer`])
//! - The start/stop lifecycle ([`ObservationSession`])
//! - An async view of the notifications ([`ChangeStream`])
//! - Sharing one session between many watchers ([`WatcherRegistry`], [`WatchHandle`])

mod callback;
mod coalescer;
mod registry;
mod session;
mod stream;

pub use callback::{CallbackRef, NativeCallback};
pub use coalescer::ChangeEventCoalescer;
pub use registry::{WatchHandle, WatcherRegistry};
pub use session::ObservationSession;
pub use stream::ChangeStream;
