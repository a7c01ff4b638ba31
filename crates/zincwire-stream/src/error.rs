use bytes::Bytes;
use serde::Deserialize;

/// Errors that can occur while reading or writing the message stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The driver output a line that cannot be parsed as JSON.
    /// Carries the raw offending bytes for diagnostics.
    #[error("driver output a message that cannot be parsed as JSON: {line:?}")]
    Malformed {
        line: Bytes,
        #[source]
        source: serde_json::Error,
    },

    /// The driver reported a fatal error message.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// An outgoing value has no JSON representation.
    #[error(transparent)]
    Encode(#[from] zincwire_value::CodecError),

    /// An outgoing message failed to serialize.
    #[error("failed to serialize outgoing message: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An I/O error occurred on the underlying byte stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;

/// A structured error reported by the driver in an `"error"` message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("solver error ({kind}): {message}")]
pub struct SolverError {
    /// Error category from the message's `what` field.
    pub kind: String,
    /// Human-readable error text.
    pub message: String,
    /// Source location within the model, when the driver provides one.
    pub location: Option<Location>,
}

/// A source location attached to a driver error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub filename: String,
    pub first_line: u64,
    pub first_column: u64,
    pub last_line: u64,
    pub last_column: u64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            filename: String::new(),
            first_line: 0,
            first_column: 0,
            last_line: 0,
            last_column: 0,
        }
    }
}

/// Maps an error-shaped message object to a [`SolverError`].
///
/// Both readers use [`error_from_message`] unless a custom mapper is
/// installed.
pub type ErrorMapper = fn(&serde_json::Value) -> SolverError;

/// The default error-mapping collaborator.
///
/// Reads `what` (category, defaulting to `"error"`), `message` (falling
/// back to the serialized object) and the optional `location` payload.
pub fn error_from_message(obj: &serde_json::Value) -> SolverError {
    let kind = obj
        .get("what")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("error")
        .to_string();
    let message = obj
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| obj.to_string());
    let location = obj
        .get("location")
        .and_then(|loc| serde_json::from_value(loc.clone()).ok());

    SolverError {
        kind,
        message,
        location,
    }
}
