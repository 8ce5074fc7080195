//! Diagnostic log that survives calls made before anyone is listening.
//!
//! Until an observer attaches, entries accumulate in a bounded ring buffer.
//! Attaching an observer flushes the buffer to it in insertion order and
//! retires the buffer for good: every later entry goes straight to the
//! observer.
//!
//! Every entry is also mirrored to `tracing` under the
//! `fcm_bridge::diagnostics` target.

mod entry;
mod logger;

pub use entry::{LogEntry, LogLevel};
pub use logger::{DiagnosticLog, LogObserver, DEFAULT_LOG_CAPACITY};
