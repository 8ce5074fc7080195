//! Native event bridge.
//!
//! Native code pushes serialized `[eventName, eventData]` frames through one
//! persistent transport channel. The bridge decodes each frame and fans the
//! payload out to the subscriptions registered for that name.
//!
//! # Architecture
//!
//! Events flow from native → Transport → EventBridge → subscribers:
//! - `NativeEvent`: decoded frame, payload typed per event name
//! - `EventBridge`: single intake, per-name listener lists, disposal
//! - Frame and handler failures go to the `DiagnosticLog`, never to callers

mod event_bridge;
mod event_types;
mod frame;

pub use event_bridge::{ChannelState, EventBridge, EventHandler, SubscribeOptions, Subscription};
pub use event_types::{
    EventPayload, NotificationPayload, COMMAND_START_EVENT_BRIDGE, EVENT_NOTIFICATION,
    EVENT_TOKEN_REFRESH,
};
pub use frame::NativeEvent;
