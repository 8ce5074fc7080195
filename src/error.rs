use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::DiagnosticLog;

/// Outcome of a passthrough call that did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("transport not available")]
    TransportUnavailable,
    #[error("native call `{method}` failed: {error}")]
    Native { method: String, error: Value },
    #[error("native call `{method}` finished without a result")]
    Dropped { method: String },
    #[error("could not encode arguments for `{method}`: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid result for `{method}`: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BridgeError {
    /// JSON form used when the error is recorded as a log parameter.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Native { error, .. } => error.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl Serialize for BridgeError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// A native event frame that could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame is not text: {0}")]
    NotText(Value),
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("invalid `{event}` payload: {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures inside the event intake. These never leave the bridge; they are
/// reported to the diagnostic log and dropped.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("listener for `{event}` panicked: {message}")]
    Handler { event: String, message: String },
    #[error("native channel error: {0}")]
    Channel(Value),
}

impl IntakeError {
    fn headline(&self) -> &'static str {
        match self {
            Self::Frame(_) => "Error parsing native event data",
            Self::Handler { .. } => "Error in native event listener",
            Self::Channel(_) => "Error listening to native events",
        }
    }

    pub(crate) fn report(&self, log: &DiagnosticLog) {
        let detail = match self {
            Self::Channel(error) => error.clone(),
            other => Value::String(other.to_string()),
        };
        log.error(self.headline(), vec![detail]);
    }
}
