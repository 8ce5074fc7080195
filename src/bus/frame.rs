use serde_json::Value;

use super::event_types::{EventPayload, EVENT_NOTIFICATION, EVENT_TOKEN_REFRESH};
use crate::error::FrameError;

/// One decoded native event. Lives only for a single dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    pub name: String,
    pub payload: EventPayload,
}

impl NativeEvent {
    /// Decode a value delivered by the transport. Frames are text holding
    /// exactly `[eventName, eventData]`.
    pub fn from_frame(frame: Value) -> Result<Self, FrameError> {
        match frame {
            Value::String(text) => Self::parse(&text),
            other => Err(FrameError::NotText(other)),
        }
    }

    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let (name, data): (String, Value) =
            serde_json::from_str(text).map_err(FrameError::Malformed)?;
        Self::decode(name, data)
    }

    /// Apply the schema registered for `name`.
    pub fn decode(name: String, data: Value) -> Result<Self, FrameError> {
        let payload = match name.as_str() {
            EVENT_NOTIFICATION => serde_json::from_value(data)
                .map(EventPayload::Notification)
                .map_err(|source| FrameError::InvalidPayload {
                    event: name.clone(),
                    source,
                })?,
            EVENT_TOKEN_REFRESH => serde_json::from_value(data)
                .map(EventPayload::TokenRefresh)
                .map_err(|source| FrameError::InvalidPayload {
                    event: name.clone(),
                    source,
                })?,
            _ => EventPayload::Other(data),
        };
        Ok(Self { name, payload })
    }
}
