//! HTTP transport: one JSON-RPC POST per invocation.
//!
//! Dispatcher::new  -> reqwest client with default + caller headers merged
//! send_unary       -> full response body (non-2xx without an envelope fails)
//! send_streaming   -> live SSE `data:` payloads in arrival order
//!
//! Nothing here is retried; a failed call is terminal for the invocation.

use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use crate::error::{CallError, Result};
use crate::rpc::{JsonRpcRequest, JsonRpcResponse};

/// Default timeout for unary requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection-establishment bound. Streaming sessions have no overall
/// deadline; the process stays blocked for as long as the server pushes.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the HTTP client and the target endpoint for a single call.
#[derive(Debug)]
pub struct Dispatcher {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl Dispatcher {
    /// Build the client. `Content-Type: application/json` is installed as
    /// a default; caller headers are merged over it, caller wins on
    /// conflict (including an explicit `Content-Type`).
    pub fn new(url: Url, header_items: &[(String, String)], timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in header_items {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| CallError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| CallError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, url, timeout })
    }

    /// POST the envelope and read the full response body.
    ///
    /// A JSON-RPC error envelope may ride on a non-2xx status; when the
    /// body parses as an envelope it is returned for rendering, otherwise
    /// the status itself is the failure.
    pub async fn send_unary(&self, request: &JsonRpcRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url.clone())
            .json(request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "unary response received");

        if !status.is_success() && JsonRpcResponse::decode(&body).is_err() {
            return Err(CallError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        Ok(body)
    }

    /// POST the envelope and surface each SSE `data:` payload as it
    /// arrives. The returned stream ends when the server closes the
    /// connection; a drop mid-stream yields a stream-interrupted error.
    pub async fn send_streaming(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<BoxStream<'static, Result<String>>> {
        let response = self
            .http
            .post(self.url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        debug!(%status, "event stream open");

        let events = response.bytes_stream().eventsource();
        let events = events.filter_map(|item| async move {
            match item {
                Ok(event) if event.data.is_empty() => None,
                Ok(event) => Some(Ok(event.data)),
                Err(e) => Some(Err(CallError::StreamInterrupted(e.to_string()))),
            }
        });
        Ok(events.boxed())
    }
}

/// Short body excerpt for status-failure diagnostics.
fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let mut head: String = trimmed.chars().take(MAX).collect();
        head.push('…');
        head
    }
}

/* --------------------------------- Tests ---------------------------------- */
