use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;

use super::{ExecCall, ResultCallback, Transport};
use crate::bus::COMMAND_START_EVENT_BRIDGE;

/// Native side of a [`ChannelTransport`].
#[async_trait]
pub trait NativeHandler: Send + Sync + 'static {
    /// Handle one request/response call. `Err` values reach the caller's
    /// error callback unchanged.
    async fn handle(&self, method: &str, args: Vec<Value>) -> Result<Value, Value>;
}

#[derive(Clone)]
struct Intake {
    on_event: ResultCallback,
    on_error: ResultCallback,
}

type Intakes = Arc<Mutex<Vec<Intake>>>;

/// In-process transport.
///
/// Request/response calls are spawned onto the tokio runtime and answered by a
/// [`NativeHandler`]. `startJsEventBridge` calls register a persistent intake
/// that is fed through the transport's [`EventSink`].
pub struct ChannelTransport {
    platform: String,
    handler: Arc<dyn NativeHandler>,
    intakes: Intakes,
    runtime: Handle,
}

impl fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("platform", &self.platform)
            .field("intakes", &lock(&self.intakes).len())
            .finish()
    }
}

impl ChannelTransport {
    pub fn new<H>(platform: impl Into<String>, handler: H, runtime: Handle) -> Self
    where
        H: NativeHandler,
    {
        Self {
            platform: platform.into(),
            handler: Arc::new(handler),
            intakes: Arc::new(Mutex::new(Vec::new())),
            runtime,
        }
    }

    /// Handle through which native code pushes event frames.
    pub fn event_sink(&self) -> EventSink {
        EventSink {
            intakes: self.intakes.clone(),
        }
    }
}

impl Transport for ChannelTransport {
    fn exec(&self, call: ExecCall) {
        if call.method == COMMAND_START_EVENT_BRIDGE {
            tracing::debug!(plugin = %call.plugin, "event intake registered");
            lock(&self.intakes).push(Intake {
                on_event: call.on_success,
                on_error: call.on_error,
            });
            return;
        }

        let handler = self.handler.clone();
        self.runtime.spawn(async move {
            match handler.handle(&call.method, call.args).await {
                Ok(value) => (call.on_success)(value),
                Err(error) => (call.on_error)(error),
            }
        });
    }

    fn platform_id(&self) -> Option<String> {
        Some(self.platform.clone())
    }
}

/// Pushes frames into every registered intake.
#[derive(Clone)]
pub struct EventSink {
    intakes: Intakes,
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("intakes", &lock(&self.intakes).len())
            .finish()
    }
}

impl EventSink {
    /// Serialize `[name, data]` the way native code does and deliver it.
    pub fn emit(&self, name: &str, data: Value) -> usize {
        let frame = Value::Array(vec![Value::String(name.to_string()), data]).to_string();
        self.emit_raw(frame)
    }

    /// Deliver a frame verbatim. Returns how many intakes received it.
    pub fn emit_raw(&self, frame: impl Into<String>) -> usize {
        let frame = Value::String(frame.into());
        let intakes = lock(&self.intakes).clone();
        for intake in &intakes {
            (intake.on_event)(frame.clone());
        }
        intakes.len()
    }

    /// Report a channel failure to every intake.
    pub fn fail(&self, error: Value) -> usize {
        let intakes = lock(&self.intakes).clone();
        for intake in &intakes {
            (intake.on_error)(error.clone());
        }
        intakes.len()
    }

    pub fn intake_count(&self) -> usize {
        lock(&self.intakes).len()
    }
}

fn lock(intakes: &Intakes) -> std::sync::MutexGuard<'_, Vec<Intake>> {
    intakes
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
