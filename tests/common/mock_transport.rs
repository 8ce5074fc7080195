// tests/common/mock_transport.rs
//! Scriptable transport for exercising the bridge without native code.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use fcm_bridge_lib::bus::COMMAND_START_EVENT_BRIDGE;
use fcm_bridge_lib::transport::{ExecCall, ResultCallback, Transport};

/// A call as the native side would have received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub plugin: String,
    pub method: String,
    pub args: Vec<Value>,
}

/// A transport that answers calls synchronously from a response table.
///
/// Methods without a scripted response resolve with `null`. Event intakes
/// are kept so tests can push frames or fail the channel.
pub struct MockTransport {
    platform: Option<String>,
    responses: Mutex<HashMap<String, Result<Value, Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
    intakes: Mutex<Vec<(ResultCallback, ResultCallback)>>,
}

impl MockTransport {
    /// Create a mock reporting the given platform id.
    pub fn new(platform: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            intakes: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that reports no platform id at all.
    pub fn without_platform() -> Self {
        Self {
            platform: None,
            ..Self::new("")
        }
    }

    /// Resolve future calls to `method` with `value`.
    pub fn resolve(&self, method: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Ok(value));
    }

    /// Reject future calls to `method` with `error`.
    pub fn reject(&self, method: &str, error: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }

    pub fn intake_count(&self) -> usize {
        self.intakes.lock().unwrap().len()
    }

    /// Deliver a raw frame to every intake.
    pub fn push_frame(&self, frame: &str) {
        let intakes = self.intakes.lock().unwrap().clone();
        for (on_event, _) in intakes {
            on_event(Value::String(frame.to_string()));
        }
    }

    /// Serialize `[name, data]` and deliver it.
    pub fn push_event(&self, name: &str, data: Value) {
        let frame = Value::Array(vec![Value::String(name.to_string()), data]).to_string();
        self.push_frame(&frame);
    }

    pub fn fail_channel(&self, error: Value) {
        let intakes = self.intakes.lock().unwrap().clone();
        for (_, on_error) in intakes {
            on_error(error.clone());
        }
    }

    /// Wrap for use as the plugin's transport.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Transport for MockTransport {
    fn exec(&self, call: ExecCall) {
        self.calls.lock().unwrap().push(RecordedCall {
            plugin: call.plugin.clone(),
            method: call.method.clone(),
            args: call.args.clone(),
        });

        if call.method == COMMAND_START_EVENT_BRIDGE {
            self.intakes
                .lock()
                .unwrap()
                .push((call.on_success, call.on_error));
            return;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&call.method)
            .cloned()
            .unwrap_or(Ok(Value::Null));
        match response {
            Ok(value) => (call.on_success)(value),
            Err(error) => (call.on_error)(error),
        }
    }

    fn platform_id(&self) -> Option<String> {
        self.platform.clone()
    }
}
