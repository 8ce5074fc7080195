//! Replay captured native event frames through the bridge.
//!
//! Reads one frame per line from the file given as the first argument, or
//! from stdin, and pushes each through an in-process transport into a
//! `FirebaseMessaging` context. Decoded events and diagnostic entries are
//! written to stdout as JSON lines.
//!
//! Usage:
//!   fcm-frame-replay frames.txt
//!   FCM_BRIDGE_LOG_CAPACITY=50 fcm-frame-replay < frames.txt

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use fcm_bridge_lib::config::BridgeConfig;
use fcm_bridge_lib::transport::{ChannelTransport, NativeHandler, Transport};
use fcm_bridge_lib::{EventPayload, FirebaseMessaging, SubscribeOptions};

/// Stand-in for the native SDK: acknowledges `ready` and rejects the rest.
struct ReplayNative;

#[async_trait]
impl NativeHandler for ReplayNative {
    async fn handle(&self, method: &str, _args: Vec<Value>) -> Result<Value, Value> {
        match method {
            "ready" => Ok(Value::Null),
            other => Err(json!(format!("{other} is not available during replay"))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fcm_bridge_lib::init_tracing();

    let config = match std::env::var("FCM_BRIDGE_CONFIG") {
        Ok(path) => BridgeConfig::load(&PathBuf::from(path))?.apply_env()?,
        Err(_) => BridgeConfig::from_env()?,
    };
    let platform = std::env::var("FCM_BRIDGE_PLATFORM").unwrap_or_else(|_| "android".into());

    let transport = Arc::new(ChannelTransport::new(
        platform,
        ReplayNative,
        tokio::runtime::Handle::current(),
    ));
    let sink = transport.event_sink();
    let plugin = FirebaseMessaging::new(Some(transport as Arc<dyn Transport>), config);

    plugin.on_log(|entry| match serde_json::to_string(&entry) {
        Ok(line) => println!("{{\"log\":{line}}}"),
        Err(err) => tracing::warn!("unprintable log entry: {err}"),
    });

    let dispatched = Arc::new(AtomicUsize::new(0));
    let counter = dispatched.clone();
    let _notifications = plugin.on_notification(
        move |notification| {
            counter.fetch_add(1, Ordering::Relaxed);
            let event = EventPayload::Notification(notification.clone()).to_value();
            println!("{}", json!({ "notification": event }));
        },
        SubscribeOptions::default(),
    );
    let counter = dispatched.clone();
    let _tokens = plugin.on_token_refresh(
        move |token| {
            counter.fetch_add(1, Ordering::Relaxed);
            println!("{}", json!({ "tokenRefresh": token }));
        },
        SubscribeOptions::default(),
    );

    plugin.init().await;

    let input: Box<dyn AsyncRead + Unpin + Send> = match std::env::args().nth(1) {
        Some(path) => Box::new(tokio::fs::File::open(&path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    let mut lines = BufReader::new(input).lines();
    let mut frames = 0usize;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        frames += 1;
        sink.emit_raw(line);
    }

    tracing::info!(
        frames,
        dispatched = dispatched.load(Ordering::Relaxed),
        "replay finished"
    );
    Ok(())
}
