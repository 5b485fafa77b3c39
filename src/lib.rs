//! netwatch-bridge: connectivity change bridge
//!
//! A library that subscribes to a platform connectivity service, collapses
//! the events it reports into a single "interfaces may have changed"
//! notification, and delivers that notification to one opaque callback.

pub mod config;
pub mod connectivity;
pub mod replay;
pub mod watch;
