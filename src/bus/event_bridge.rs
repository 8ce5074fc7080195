use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::event_types::{EventPayload, COMMAND_START_EVENT_BRIDGE};
use super::frame::NativeEvent;
use crate::diagnostics::DiagnosticLog;
use crate::error::IntakeError;
use crate::transport::{self, ExecCall, ResultCallback, Transport};

/// Subscriber callback. Receives the payload only, never the envelope.
pub type EventHandler = Arc<dyn Fn(&EventPayload) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeOptions {
    /// Dispose automatically after the first delivery.
    #[serde(default)]
    pub once: bool,
}

impl SubscribeOptions {
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// Lifecycle of the native intake. There is no way back to `Unattached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Unattached,
    Attached,
}

#[derive(Clone)]
struct Listener {
    id: u64,
    once: bool,
    disposed: Arc<AtomicBool>,
    handler: EventHandler,
}

impl Listener {
    /// Whether this listener may receive the current dispatch. A `once`
    /// listener is disposed here, before its handler runs.
    fn claim(&self) -> bool {
        if self.once {
            self.disposed
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        } else {
            !self.disposed.load(Ordering::Acquire)
        }
    }
}

struct BridgeInner {
    listeners: DashMap<String, Vec<Listener>>,
    next_id: AtomicU64,
    intakes: AtomicUsize,
    log: DiagnosticLog,
}

impl BridgeInner {
    fn remove(&self, event_name: &str, id: u64) {
        if let Some(mut listeners) = self.listeners.get_mut(event_name) {
            listeners.retain(|listener| listener.id != id);
        }
        self.listeners
            .remove_if(event_name, |_, listeners| listeners.is_empty());
    }
}

/// Demultiplexes the native event channel into per-name subscriptions.
///
/// Cloning yields another handle to the same bridge.
#[derive(Clone)]
pub struct EventBridge {
    inner: Arc<BridgeInner>,
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("state", &self.state())
            .field("events", &self.inner.listeners.len())
            .finish()
    }
}

impl EventBridge {
    pub fn new(log: DiagnosticLog) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                listeners: DashMap::new(),
                next_id: AtomicU64::new(0),
                intakes: AtomicUsize::new(0),
                log,
            }),
        }
    }

    pub fn state(&self) -> ChannelState {
        if self.inner.intakes.load(Ordering::Acquire) > 0 {
            ChannelState::Attached
        } else {
            ChannelState::Unattached
        }
    }

    /// Register the persistent native intake.
    ///
    /// Meant to run once during plugin initialization: every call registers
    /// another intake with the transport.
    pub fn attach(&self, transport: Option<&dyn Transport>, plugin: &str) {
        let on_event: ResultCallback = {
            let bridge = self.clone();
            Arc::new(move |frame: Value| bridge.on_intake(frame))
        };
        let on_error: ResultCallback = {
            let bridge = self.clone();
            Arc::new(move |error: Value| bridge.on_intake_error(error))
        };

        let call = ExecCall {
            plugin: plugin.to_string(),
            method: COMMAND_START_EVENT_BRIDGE.to_string(),
            args: Vec::new(),
            on_success: on_event,
            on_error,
        };

        if transport.is_some() {
            let previous = self.inner.intakes.fetch_add(1, Ordering::AcqRel);
            if previous > 0 {
                self.inner.log.warn(
                    "native event intake attached more than once",
                    vec![json!(previous + 1)],
                );
            }
            tracing::info!(plugin, "attaching native event intake");
        }

        transport::exec(transport, call);
    }

    /// Entry point for raw frames from the transport. Never fails: bad frames
    /// are logged and dropped.
    pub fn on_intake(&self, frame: Value) {
        match NativeEvent::from_frame(frame) {
            Ok(event) => {
                self.dispatch(&event);
            }
            Err(err) => {
                IntakeError::from(err).report(&self.inner.log);
            }
        }
    }

    /// The native channel reported an error. Nothing is retried.
    pub fn on_intake_error(&self, error: Value) {
        tracing::error!(%error, "native event channel failed");
        IntakeError::Channel(error).report(&self.inner.log);
    }

    /// Deliver `event` to its live subscribers in registration order.
    ///
    /// Handlers run with no lock held, so they may subscribe or dispose. A
    /// panicking handler is logged and skipped. Returns how many handlers
    /// completed.
    pub fn dispatch(&self, event: &NativeEvent) -> usize {
        let snapshot = match self.inner.listeners.get(&event.name) {
            Some(listeners) => listeners.value().clone(),
            None => return 0,
        };

        let mut delivered = 0;
        for listener in snapshot {
            if !listener.claim() {
                continue;
            }
            if listener.once {
                self.inner.remove(&event.name, listener.id);
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                (listener.handler)(&event.payload)
            }));
            match outcome {
                Ok(()) => delivered += 1,
                Err(panic) => IntakeError::Handler {
                    event: event.name.clone(),
                    message: panic_message(panic.as_ref()),
                }
                .report(&self.inner.log),
            }
        }

        tracing::trace!(event = %event.name, delivered, "native event dispatched");
        delivered
    }

    pub fn subscribe<F>(
        &self,
        event_name: impl Into<String>,
        handler: F,
        options: SubscribeOptions,
    ) -> Subscription
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        let event_name = event_name.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let disposed = Arc::new(AtomicBool::new(false));

        self.inner
            .listeners
            .entry(event_name.clone())
            .or_default()
            .push(Listener {
                id,
                once: options.once,
                disposed: disposed.clone(),
                handler: Arc::new(handler),
            });

        Subscription {
            id,
            event_name,
            disposed,
            bridge: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions for `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.inner
            .listeners
            .get(event_name)
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    pub fn logger(&self) -> &DiagnosticLog {
        &self.inner.log
    }
}

/// Handle to one registration. Dropping it does not unsubscribe; call
/// [`Subscription::dispose`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    event_name: String,
    disposed: Arc<AtomicBool>,
    bridge: Weak<BridgeInner>,
}

impl Subscription {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Stop future deliveries. Safe to call any number of times.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(bridge) = self.bridge.upgrade() {
            bridge.remove(&self.event_name, self.id);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
