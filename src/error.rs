//! Call error taxonomy.
//!
//! Every failure class carries its own process exit code so scripts can
//! tell bad input apart from transport faults and protocol faults.

use thiserror::Error;

/// Exit code used when the agent answered with an error-shape envelope.
/// Not a [`CallError`]: the error payload is still rendered on stdout.
pub const EXIT_RPC_ERROR: i32 = 1;

/// Terminal failure of a single invocation. Nothing here is retried.
#[derive(Debug, Error)]
pub enum CallError {
    /// Positional item without a recognized separator, or with an empty
    /// key or value.
    #[error("invalid item '{token}' at position {index} (expected key=value, key:=json or key:header)")]
    MalformedItem { index: usize, token: String },

    /// `key:=value` payload that is not valid JSON. No fallback to string.
    #[error("invalid JSON value for '{key}': {raw}")]
    JsonValue {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Header item that does not form a legal HTTP header name/value.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Network-level failure: connect, timeout, mid-body I/O.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status whose body is not a JSON-RPC envelope.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body (or stream event) that is not a JSON-RPC envelope.
    #[error("invalid JSON-RPC response: {reason}")]
    ProtocolDecode { reason: String },

    /// Streaming connection dropped before the server closed it.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

impl CallError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            CallError::MalformedItem { .. } | CallError::InvalidHeader { .. } => 2,
            CallError::JsonValue { .. } => 3,
            CallError::Transport(_) | CallError::HttpStatus { .. } => 4,
            CallError::ProtocolDecode { .. } => 5,
            CallError::StreamInterrupted(_) => 6,
        }
    }

    /// True for failures detected before any network activity.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CallError::MalformedItem { .. }
                | CallError::JsonValue { .. }
                | CallError::InvalidHeader { .. }
        )
    }
}

/// Result type for call operations.
pub type Result<T> = std::result::Result<T, CallError>;
