//! Native event names and their payload schemas.
//!
//! Payloads are decoded once, at the frame boundary, so subscribers see typed
//! values instead of raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Native command that opens the persistent event channel.
pub const COMMAND_START_EVENT_BRIDGE: &str = "startJsEventBridge";

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const EVENT_NOTIFICATION: &str = "notification";
pub const EVENT_TOKEN_REFRESH: &str = "tokenRefresh";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A push message as delivered by native code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Whether the user opened the app by tapping the notification.
    #[serde(rename = "wasTapped", default)]
    pub was_tapped: bool,
    /// Remaining keys of the FCM data hash.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl NotificationPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Decoded payload of one native event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Notification(NotificationPayload),
    TokenRefresh(String),
    /// Any event name without a dedicated schema.
    Other(Value),
}

impl EventPayload {
    pub fn as_notification(&self) -> Option<&NotificationPayload> {
        match self {
            Self::Notification(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::TokenRefresh(token) => Some(token),
            _ => None,
        }
    }

    /// JSON form of the payload, as native code sent it.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Notification(payload) => {
                let mut object = payload.data.clone();
                object.insert("wasTapped".to_string(), Value::Bool(payload.was_tapped));
                Value::Object(object)
            }
            Self::TokenRefresh(token) => Value::String(token.clone()),
            Self::Other(value) => value.clone(),
        }
    }
}
