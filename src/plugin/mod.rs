//! Plugin context.
//!
//! `FirebaseMessaging` owns the diagnostic log and the event bridge for one
//! host, and is what application code talks to:
//! - `init`: signals readiness to native code and opens the event channel
//! - `on_notification` / `on_token_refresh`: typed subscriptions
//! - `on_log`: diagnostic observer, receives everything logged so far
//! - passthrough calls (`get_token`, `subscribe_to_topic`, ...) forward to
//!   native code

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::bus::{
    EventBridge, EventPayload, NotificationPayload, SubscribeOptions, Subscription,
    EVENT_NOTIFICATION, EVENT_TOKEN_REFRESH,
};
use crate::config::BridgeConfig;
use crate::diagnostics::{DiagnosticLog, LogEntry};
use crate::error::BridgeError;
use crate::transport::{self, Platform, Transport};

mod commands;
mod types;

pub use types::{
    AccountInfo, ChannelConfig, Importance, Ios9Support, RequestPushPermissionOptions, Visibility,
};

pub struct FirebaseMessaging {
    transport: Option<Arc<dyn Transport>>,
    config: BridgeConfig,
    log: DiagnosticLog,
    bridge: EventBridge,
}

impl fmt::Debug for FirebaseMessaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseMessaging")
            .field("transport", &self.transport.as_ref().map(|_| "<transport>"))
            .field("config", &self.config)
            .field("log", &self.log)
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl FirebaseMessaging {
    /// Create the context. `transport` is `None` when the host exposes no
    /// native bridge; every call then fails with
    /// [`BridgeError::TransportUnavailable`].
    pub fn new(transport: Option<Arc<dyn Transport>>, config: BridgeConfig) -> Self {
        let log = DiagnosticLog::with_capacity(config.log_buffer_capacity);
        let bridge = EventBridge::new(log.clone());
        log.log("plugin wrapper has been created", Vec::new());

        Self {
            transport,
            config,
            log,
            bridge,
        }
    }

    /// Tell native code the web side is ready, then open the event channel.
    ///
    /// A failed `ready` call is logged and does not stop the channel from
    /// being attached.
    pub async fn init(&self) {
        if let Err(err) = self.invoke::<Value>("ready", Vec::new()).await {
            self.log.error("Ready error: ", vec![err.to_value()]);
        }
        self.log.log("FCM Ready!", Vec::new());
        self.bridge
            .attach(self.transport.as_deref(), &self.config.plugin_name);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn logger(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn bridge(&self) -> &EventBridge {
        &self.bridge
    }

    pub fn platform(&self) -> Option<Platform> {
        self.transport
            .as_ref()
            .and_then(|transport| transport.platform_id())
            .map(|id| Platform::from_id(&id))
    }

    fn platform_is(&self, platform: Platform) -> bool {
        self.platform() == Some(platform)
    }

    /// Install the diagnostic observer. Entries logged before this call are
    /// replayed to it first.
    pub fn on_log<F>(&self, observer: F)
    where
        F: Fn(LogEntry) + Send + Sync + 'static,
    {
        self.log.on_log(observer);
    }

    pub fn on_notification<F>(&self, handler: F, options: SubscribeOptions) -> Subscription
    where
        F: Fn(&NotificationPayload) + Send + Sync + 'static,
    {
        self.bridge.subscribe(
            EVENT_NOTIFICATION,
            move |payload: &EventPayload| {
                if let Some(notification) = payload.as_notification() {
                    handler(notification);
                }
            },
            options,
        )
    }

    pub fn on_token_refresh<F>(&self, handler: F, options: SubscribeOptions) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.bridge.subscribe(
            EVENT_TOKEN_REFRESH,
            move |payload: &EventPayload| {
                if let Some(token) = payload.as_token() {
                    handler(token);
                }
            },
            options,
        )
    }

    /// Subscribe to any native event by name.
    pub fn on_event<F>(
        &self,
        event_name: impl Into<String>,
        handler: F,
        options: SubscribeOptions,
    ) -> Subscription
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        self.bridge.subscribe(event_name, handler, options)
    }

    async fn invoke<T>(&self, method: &str, args: Vec<Value>) -> Result<T, BridgeError>
    where
        T: serde::de::DeserializeOwned,
    {
        transport::call(
            self.transport.as_deref(),
            &self.config.plugin_name,
            method,
            args,
        )
        .await
    }
}
