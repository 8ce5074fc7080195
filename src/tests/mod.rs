//! Test helpers shared by the in-crate test modules.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::diagnostics::{DiagnosticLog, LogEntry};
use crate::transport::{ExecCall, Transport};



/// Transport that keeps every call so tests can drive the callbacks.
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: Mutex<Vec<ExecCall>>,
}

impl RecordingTransport {
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.method.clone())
            .collect()
    }

    /// Feed `frame` to the success callback of call `index`.
    pub fn push(&self, index: usize, frame: &str) {
        let callback = self.calls.lock().unwrap()[index].on_success.clone();
        callback(Value::String(frame.to_string()));
    }

    pub fn fail(&self, index: usize, error: Value) {
        let callback = self.calls.lock().unwrap()[index].on_error.clone();
        callback(error);
    }
}

impl Transport for RecordingTransport {
    fn exec(&self, call: ExecCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn platform_id(&self) -> Option<String> {
        Some("android".to_string())
    }
}

/// Attach an observer that stores every entry.
pub fn collect_log(log: &DiagnosticLog) -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let sink = entries.clone();
    log.on_log(move |entry| sink.lock().unwrap().push(entry));
    entries
}

/// Shared vector plus a pusher for recording handler invocations.
pub fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + Clone) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |value: T| sink.lock().unwrap().push(value))
}
