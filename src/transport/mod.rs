//! Host transport abstraction.
//!
//! The host provides one call primitive: `exec(success, error, plugin,
//! method, args)`. It invokes exactly one of the callbacks per result, except
//! for persistent channels such as `startJsEventBridge`, whose success
//! callback fires once per native event frame.
//!
//! - `Transport`: the consumed interface
//! - `exec`: issues a call, reporting a missing transport through the error
//!   callback with [`TRANSPORT_UNAVAILABLE`]
//! - `call`: awaits a single result and decodes it
//! - `ChannelTransport`: in-process implementation backed by an async handler

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::BridgeError;

mod channel;
mod platform;

pub use channel::{ChannelTransport, EventSink, NativeHandler};
pub use platform::Platform;

/// Sentinel passed to the error callback when no transport exists.
pub const TRANSPORT_UNAVAILABLE: &str = "cordova_not_available";

/// Callback receiving a native result or error value.
pub type ResultCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// One `exec` invocation.
pub struct ExecCall {
    pub plugin: String,
    pub method: String,
    pub args: Vec<Value>,
    pub on_success: ResultCallback,
    pub on_error: ResultCallback,
}

impl fmt::Debug for ExecCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecCall")
            .field("plugin", &self.plugin)
            .field("method", &self.method)
            .field("args", &self.args)
            .field("on_success", &"<function>")
            .field("on_error", &"<function>")
            .finish()
    }
}

pub trait Transport: Send + Sync {
    /// Forward a call to native code. Results arrive through the callbacks,
    /// possibly on another thread.
    fn exec(&self, call: ExecCall);

    /// Identifier of the platform the host runs on (`android`, `ios`, ...).
    fn platform_id(&self) -> Option<String>;
}

/// Issue `call` on `transport`, or fail it with [`TRANSPORT_UNAVAILABLE`] when
/// there is no transport.
pub fn exec(transport: Option<&dyn Transport>, call: ExecCall) {
    match transport {
        Some(transport) => transport.exec(call),
        None => {
            tracing::warn!("{}.{}(...) :: cordova not available", call.plugin, call.method);
            (call.on_error)(Value::String(TRANSPORT_UNAVAILABLE.to_string()));
        }
    }
}

/// Issue a request/response call and decode the first result.
pub async fn call<T>(
    transport: Option<&dyn Transport>,
    plugin: &str,
    method: &str,
    args: Vec<Value>,
) -> Result<T, BridgeError>
where
    T: DeserializeOwned,
{
    let call_id = Uuid::new_v4();
    tracing::debug!(%call_id, plugin, method, "native call started");

    let (tx, rx) = oneshot::channel::<Result<Value, Value>>();
    let slot = Arc::new(Mutex::new(Some(tx)));

    let on_success: ResultCallback = {
        let slot = slot.clone();
        Arc::new(move |value: Value| settle(&slot, Ok(value)))
    };
    let on_error: ResultCallback = {
        let slot = slot.clone();
        Arc::new(move |error: Value| settle(&slot, Err(error)))
    };

    exec(
        transport,
        ExecCall {
            plugin: plugin.to_string(),
            method: method.to_string(),
            args,
            on_success,
            on_error,
        },
    );

    let outcome = rx.await.map_err(|_| BridgeError::Dropped {
        method: method.to_string(),
    })?;

    match outcome {
        Ok(value) => {
            tracing::debug!(%call_id, method, "native call resolved");
            serde_json::from_value(value).map_err(|source| BridgeError::Decode {
                method: method.to_string(),
                source,
            })
        }
        Err(Value::String(sentinel)) if sentinel == TRANSPORT_UNAVAILABLE => {
            Err(BridgeError::TransportUnavailable)
        }
        Err(error) => {
            tracing::debug!(%call_id, method, %error, "native call rejected");
            Err(BridgeError::Native {
                method: method.to_string(),
                error,
            })
        }
    }
}

type Settle = oneshot::Sender<Result<Value, Value>>;

// Only the first callback counts; later ones are dropped.
fn settle(slot: &Mutex<Option<Settle>>, outcome: Result<Value, Value>) {
    let sender = slot
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(outcome);
    }
}
