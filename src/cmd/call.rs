/*!
call.rs

The single call flow for the `a2a-call` CLI:

  items -> Token Parser -> Request Builder -> Transport Dispatcher
        -> (unary | streaming) -> Response Renderer

Unary: stdout carries the whole response envelope in verbose mode, or
just its `result`/`error` payload otherwise. Streaming: each event is
decoded and rendered the moment it arrives, in arrival order, with no
whole-stream buffering. The Verbose Tracer observes both boundaries on
stderr.

Returned exit status:
  0  success-shape response / stream closed cleanly
  1  error-shape response (unary, or any error-shape event in a stream)
Every other failure leaves through `CallError` and its own exit code.
*/

use std::time::Duration;

use clap::Parser;
use futures::StreamExt;
use tracing::debug;
use url::Url;

use crate::cmd::format::{StyleOptions, print_json};
use crate::cmd::trace::Tracer;
use crate::error::{EXIT_RPC_ERROR, Result};
use crate::http::{DEFAULT_TIMEOUT, Dispatcher};
use crate::items::parse_items;
use crate::rpc::{JsonRpcRequest, JsonRpcResponse, is_streaming_method};

/* -------------------------------------------------------------------------- */
/* CLI Surface                                                                */
/* -------------------------------------------------------------------------- */

/// A command-line client for invoking JSON-RPC methods on A2A agents.
///
/// Parameters and headers are positional items after the method name:
///
///   key=value     string parameter
///
///   key:=json     JSON-typed parameter (object, array, number, bool, null)
///
///   key:value     HTTP header
///
/// Methods answered with an event stream (message/stream and friends)
/// are consumed until the agent closes the connection, printing each
/// event as it arrives.
#[derive(Parser, Debug)]
#[command(
    name = "a2a-call",
    version,
    about = "A command-line client for invoking JSON-RPC methods on A2A agents",
    disable_help_subcommand = true
)]
pub struct CallArgs {
    /// Agent endpoint URL
    pub url: Url,

    /// JSON-RPC method to invoke (passed through verbatim)
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub method: String,

    /// Parameter items (key=value, key:=json) and header items (key:value)
    #[arg(value_name = "ITEM")]
    pub items: Vec<String>,

    /// Print outgoing and incoming JSON-RPC traffic on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Request timeout in seconds for unary calls (streaming calls only
    /// bound connection establishment)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

/* -------------------------------------------------------------------------- */
/* Entry Point                                                                */
/* -------------------------------------------------------------------------- */

/// Run one call end to end. Returns the process exit code on the happy
/// paths; all parse/transport/protocol failures propagate as `CallError`.
pub async fn execute_call(args: CallArgs) -> Result<i32> {
    let parsed = parse_items(&args.items)?;
    debug!(
        method = %args.method,
        params = parsed.params.len(),
        headers = parsed.headers.len(),
        "items classified"
    );

    let request = JsonRpcRequest::new(args.method.as_str(), parsed.params);
    let dispatcher = Dispatcher::new(
        args.url,
        &parsed.headers,
        Duration::from_secs(args.timeout),
    )?;

    let tracer = Tracer::new(args.verbose);
    tracer.request(&request, &parsed.headers);

    let style = StyleOptions::detect();
    if is_streaming_method(&args.method) {
        render_stream(&dispatcher, &request, &tracer, args.verbose, &style).await
    } else {
        render_unary(&dispatcher, &request, &tracer, args.verbose, &style).await
    }
}

/* -------------------------------------------------------------------------- */
/* Response Rendering                                                         */
/* -------------------------------------------------------------------------- */

async fn render_unary(
    dispatcher: &Dispatcher,
    request: &JsonRpcRequest,
    tracer: &Tracer,
    verbose: bool,
    style: &StyleOptions,
) -> Result<i32> {
    let body = dispatcher.send_unary(request).await?;
    let envelope = JsonRpcResponse::decode(&body)?;
    tracer.response(&envelope);

    if verbose {
        print_json(&envelope, style);
    } else {
        print_json(&envelope.payload(), style);
    }
    Ok(exit_status(envelope.is_error()))
}

async fn render_stream(
    dispatcher: &Dispatcher,
    request: &JsonRpcRequest,
    tracer: &Tracer,
    verbose: bool,
    style: &StyleOptions,
) -> Result<i32> {
    let mut events = dispatcher.send_streaming(request).await?;

    let mut saw_error = false;
    while let Some(item) = events.next().await {
        let data = item?;
        let envelope = JsonRpcResponse::decode(&data)?;
        tracer.event(&envelope);

        if verbose {
            print_json(&envelope, style);
        } else {
            print_json(&envelope.payload(), style);
        }
        saw_error |= envelope.is_error();
    }
    debug!("event stream closed by server");
    Ok(exit_status(saw_error))
}

fn exit_status(saw_error: bool) -> i32 {
    if saw_error { EXIT_RPC_ERROR } else { 0 }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_parses_positional_surface() {
        let args = CallArgs::try_parse_from([
            "a2a-call",
            "http://localhost:9999/rpc",
            "message/send",
            "text=hi",
            "X-Trace:abc",
        ])
        .unwrap();
        assert_eq!(args.url.as_str(), "http://localhost:9999/rpc");
        assert_eq!(args.method, "message/send");
        assert_eq!(args.items, vec!["text=hi", "X-Trace:abc"]);
        assert!(!args.verbose);
        assert_eq!(args.timeout, 30);
    }

    #[test]
    fn clap_accepts_verbose_and_timeout() {
        let args = CallArgs::try_parse_from([
            "a2a-call",
            "-v",
            "--timeout",
            "5",
            "http://localhost:9999/rpc",
            "message/stream",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.timeout, 5);
        assert!(args.items.is_empty());
    }

    #[test]
    fn clap_rejects_garbage_url() {
        let err = CallArgs::try_parse_from(["a2a-call", "not a url", "message/send"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn clap_requires_url_and_method() {
        assert!(CallArgs::try_parse_from(["a2a-call"]).is_err());
        assert!(CallArgs::try_parse_from(["a2a-call", "http://x.example/"]).is_err());
    }

    #[test]
    fn exit_status_mapping() {
        assert_eq!(exit_status(false), 0);
        assert_eq!(exit_status(true), EXIT_RPC_ERROR);
    }
}
