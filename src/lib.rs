//! Contact form edge service and client guard.

pub mod client;
pub mod config;
pub mod edge;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod submission;

use std::time::{SystemTime, UNIX_EPOCH};

pub use config::ContactConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
