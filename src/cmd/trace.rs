/*!
trace.rs

Verbose traffic tracer: echoes the outgoing envelope (with its header
set) and every incoming envelope/event on stderr, so stdout stays clean
for piping even with tracing on. Pass-through only: no effect on
control flow or returned values.
*/

use serde::Serialize;

use crate::rpc::{JsonRpcRequest, JsonRpcResponse};

pub struct Tracer {
    enabled: bool,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Echo the outgoing envelope and header set before dispatch.
    pub fn request(&self, request: &JsonRpcRequest, headers: &[(String, String)]) {
        if !self.enabled {
            return;
        }
        eprintln!("Request:");
        eprintln!("{}", pretty(request));
        if !headers.is_empty() {
            eprintln!("Headers:");
            for (name, value) in headers {
                eprintln!("  {name}: {value}");
            }
        }
    }

    /// Echo a unary response envelope.
    pub fn response(&self, envelope: &JsonRpcResponse) {
        if !self.enabled {
            return;
        }
        eprintln!("Response:");
        eprintln!("{}", pretty(envelope));
    }

    /// Echo one streamed event envelope as it arrives.
    pub fn event(&self, envelope: &JsonRpcResponse) {
        if !self.enabled {
            return;
        }
        eprintln!("Event:");
        eprintln!("{}", pretty(envelope));
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    // The tracer only writes to stderr; what can be checked here is that
    // a disabled tracer is inert and an enabled one does not panic on
    // representative envelopes.
    #[test]
    fn disabled_and_enabled_paths_run() {
        let request = JsonRpcRequest::new("message/send", Map::new());
        let envelope = JsonRpcResponse::decode(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#).unwrap();
        let headers = vec![("X-Trace".to_string(), "abc".to_string())];

        Tracer::new(false).request(&request, &headers);
        let tracer = Tracer::new(true);
        tracer.request(&request, &headers);
        tracer.response(&envelope);
        tracer.event(&envelope);
    }
}
