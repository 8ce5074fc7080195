//! Push-notification bridge between a native FCM SDK and web-view code.
//!
//! Native code owns everything push-related: tokens, topics, permission
//! prompts, channels. This crate marshals calls to it and turns its single
//! event stream into typed, disposable subscriptions.
//!
//! # Architecture
//!
//! - `plugin`: `FirebaseMessaging` context and passthrough calls
//! - `bus`: native event decoding and subscriber fan-out
//! - `diagnostics`: buffered log that waits for an observer
//! - `transport`: host `exec` abstraction and an in-process implementation
//! - `config`: settings from defaults, JSON files and the environment

pub mod bus;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod plugin;
pub mod transport;

#[cfg(test)]
mod tests;

pub use bus::{EventPayload, NotificationPayload, SubscribeOptions, Subscription};
pub use config::BridgeConfig;
pub use diagnostics::{DiagnosticLog, LogEntry, LogLevel};
pub use error::BridgeError;
pub use plugin::FirebaseMessaging;
pub use transport::{Platform, Transport};

/// Install the process-wide `tracing` subscriber used by the binaries.
///
/// Honors `RUST_LOG`; defaults to `fcm_bridge=debug,info`. Output goes to
/// stderr so stdout stays free for data.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fcm_bridge=debug,info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
