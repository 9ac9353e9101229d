//! JSON-RPC 2.0 envelopes and method-shape classification.
//!
//! JsonRpcRequest::new  -> outgoing envelope with a fresh UUIDv4 id
//! JsonRpcResponse::decode -> success or error shape, anything else rejected
//! is_streaming_method  -> unary vs server-push, isolated in one place

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{CallError, Result};

pub const JSONRPC_VERSION: &str = "2.0";

/// Methods answered with a server-push event stream rather than one reply.
const STREAMING_METHODS: &[&str] = &["message/stream", "tasks/resubscribe"];

/// Naming convention for streaming methods outside the fixed set.
const STREAMING_SUFFIX: &str = "/stream";

/// Whether `method` is answered over an event stream. The protocol pins
/// this to method names; every caller goes through here so the convention
/// can change in one place.
pub fn is_streaming_method(method: &str) -> bool {
    STREAMING_METHODS.contains(&method) || method.ends_with(STREAMING_SUFFIX)
}

/// Outgoing request envelope.
///
/// `params` is omitted entirely when empty; it is never serialized as
/// `null`. The method name is carried verbatim; methods are agent-defined
/// and not validated client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Build an envelope with a fresh per-invocation correlation id.
    pub fn new(method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            params,
        }
    }
}

/// Incoming response envelope: success shape (`result`) or error shape
/// (`error`). Absent fields are dropped on re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl JsonRpcResponse {
    /// Parse one body or stream event as a response envelope. A body that
    /// is not JSON, or is JSON with neither `result` nor `error`, is a
    /// protocol decode failure.
    pub fn decode(raw: &str) -> Result<Self> {
        let envelope: JsonRpcResponse =
            serde_json::from_str(raw).map_err(|e| CallError::ProtocolDecode {
                reason: format!("{e} in body {}", snippet(raw)),
            })?;
        if envelope.result.is_none() && envelope.error.is_none() {
            return Err(CallError::ProtocolDecode {
                reason: format!("neither result nor error in body {}", snippet(raw)),
            });
        }
        Ok(envelope)
    }

    /// True for the error shape.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The payload the non-verbose renderer prints: `error` when present,
    /// `result` otherwise.
    pub fn payload(&self) -> Value {
        match &self.error {
            Some(err) => serde_json::to_value(err).unwrap_or(Value::Null),
            None => self.result.clone().unwrap_or(Value::Null),
        }
    }
}

/// The `error` member of an error-shape envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Short body excerpt for diagnostics.
fn snippet(raw: &str) -> String {
    const MAX: usize = 120;
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX {
        format!("'{trimmed}'")
    } else {
        let head: String = trimmed.chars().take(MAX).collect();
        format!("'{head}…'")
    }
}

/* --------------------------------- Tests ---------------------------------- */
