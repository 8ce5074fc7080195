// tests/bridge_integration_test.rs
//! Native event delivery through the public subscription API.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::MockTransport;
use fcm_bridge_lib::transport::{ChannelTransport, NativeHandler, Transport};
use fcm_bridge_lib::{
    BridgeConfig, EventPayload, FirebaseMessaging, LogEntry, LogLevel, NotificationPayload,
    SubscribeOptions,
};

async fn ready_plugin() -> (FirebaseMessaging, Arc<MockTransport>) {
    let transport = MockTransport::new("android").shared();
    let plugin = FirebaseMessaging::new(
        Some(transport.clone() as Arc<dyn Transport>),
        BridgeConfig::default(),
    );
    plugin.init().await;
    (plugin, transport)
}

fn collect_log(plugin: &FirebaseMessaging) -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let sink = entries.clone();
    plugin.on_log(move |entry| sink.lock().unwrap().push(entry));
    entries
}

#[tokio::test]
async fn test_once_notification_scenario() {
    let (plugin, transport) = ready_plugin().await;
    let seen: Arc<Mutex<Vec<NotificationPayload>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = plugin.on_notification(
        move |payload| sink.lock().unwrap().push(payload.clone()),
        SubscribeOptions::once(),
    );

    transport.push_frame(r#"["notification",{"wasTapped":true}]"#);
    transport.push_frame(r#"["notification",{"wasTapped":true}]"#);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].was_tapped);
    assert!(seen[0].data.is_empty());
    assert!(subscription.is_disposed());
}

#[tokio::test]
async fn test_token_refresh_reaches_every_subscriber() {
    let (plugin, transport) = ready_plugin().await;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let first = seen.clone();
    let a = plugin.on_token_refresh(
        move |token| first.lock().unwrap().push(format!("a:{token}")),
        SubscribeOptions::default(),
    );
    let second = seen.clone();
    let _b = plugin.on_token_refresh(
        move |token| second.lock().unwrap().push(format!("b:{token}")),
        SubscribeOptions::default(),
    );

    transport.push_event("tokenRefresh", json!("t1"));
    a.dispose();
    transport.push_event("tokenRefresh", json!("t2"));

    assert_eq!(*seen.lock().unwrap(), vec!["a:t1", "b:t1", "b:t2"]);
}

#[tokio::test]
async fn test_notification_handlers_ignore_other_events() {
    let (plugin, transport) = ready_plugin().await;
    let seen = Arc::new(Mutex::new(0usize));
    let sink = seen.clone();
    plugin.on_notification(
        move |_| *sink.lock().unwrap() += 1,
        SubscribeOptions::default(),
    );

    transport.push_event("tokenRefresh", json!("t"));
    transport.push_event("custom", json!({"wasTapped": true}));
    assert_eq!(*seen.lock().unwrap(), 0);

    transport.push_event("notification", json!({"wasTapped": false, "title": "x"}));
    assert_eq!(*seen.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_custom_events_carry_raw_payload() {
    let (plugin, transport) = ready_plugin().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    plugin.on_event(
        "badgeChanged",
        move |payload: &EventPayload| sink.lock().unwrap().push(payload.to_value()),
        SubscribeOptions::default(),
    );

    transport.push_event("badgeChanged", json!({"count": 3}));
    assert_eq!(*seen.lock().unwrap(), vec![json!({"count": 3})]);
}

#[tokio::test]
async fn test_bad_frames_and_channel_failure_are_only_logged() {
    let (plugin, transport) = ready_plugin().await;
    let entries = collect_log(&plugin);
    let seen = Arc::new(Mutex::new(0usize));
    let sink = seen.clone();
    plugin.on_notification(
        move |_| *sink.lock().unwrap() += 1,
        SubscribeOptions::default(),
    );

    transport.push_frame("not json at all");
    transport.push_frame(r#"["notification"]"#);
    transport.fail_channel(json!("native bridge torn down"));

    assert_eq!(*seen.lock().unwrap(), 0);
    let errors: Vec<String> = entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.level == LogLevel::Error)
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        errors,
        vec![
            "Error parsing native event data",
            "Error parsing native event data",
            "Error listening to native events",
        ]
    );
    assert_eq!(transport.intake_count(), 1);
}

// ====================================================================================
// IN-PROCESS TRANSPORT
// ====================================================================================

struct FakeNative {
    token: String,
}

#[async_trait]
impl NativeHandler for FakeNative {
    async fn handle(&self, method: &str, args: Vec<Value>) -> Result<Value, Value> {
        match method {
            "ready" => Ok(Value::Null),
            "getToken" => Ok(json!(self.token)),
            "subscribeToTopic" if args.first() == Some(&json!("")) => {
                Err(json!("topic must not be empty"))
            }
            "subscribeToTopic" => Ok(Value::Null),
            other => Err(json!(format!("unsupported: {other}"))),
        }
    }
}

#[tokio::test]
async fn test_channel_transport_end_to_end() {
    let transport = Arc::new(ChannelTransport::new(
        "android",
        FakeNative {
            token: "native-token".into(),
        },
        tokio::runtime::Handle::current(),
    ));
    let sink = transport.event_sink();
    let plugin = FirebaseMessaging::new(
        Some(transport.clone() as Arc<dyn Transport>),
        BridgeConfig::default(),
    );
    plugin.init().await;
    assert_eq!(sink.intake_count(), 1);

    assert_eq!(plugin.get_token().await.unwrap(), "native-token");
    plugin.subscribe_to_topic("weather").await.unwrap();
    assert!(plugin.subscribe_to_topic("").await.is_err());

    let tokens = Arc::new(Mutex::new(Vec::new()));
    let seen = tokens.clone();
    plugin.on_token_refresh(
        move |token| seen.lock().unwrap().push(token.to_string()),
        SubscribeOptions::default(),
    );
    sink.emit("tokenRefresh", json!("rotated"));

    assert_eq!(*tokens.lock().unwrap(), vec!["rotated"]);
}
