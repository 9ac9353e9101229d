//! a2a-call: invoke a JSON-RPC method on an A2A agent from the shell.
//!
//! Usage:
//!   a2a-call [-v] [--timeout SECS] <url> <method> [item...]
//!
//! Items:
//!   key=value     string parameter
//!   key:=json     JSON-typed parameter
//!   key:value     HTTP header
//!
//! Examples:
//!   a2a-call http://localhost:9999/rpc message/send \
//!       message:='{"role":"user","parts":[{"kind":"text","text":"hi"}]}'
//!   a2a-call -v http://localhost:9999/rpc message/stream text=hi X-Trace:abc
//!
//! Exit codes: 0 success, 1 error-shape response, 2 bad input,
//! 3 bad JSON value, 4 transport failure, 5 protocol decode failure,
//! 6 interrupted stream.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cmd;
mod error;
mod http;
mod items;
mod rpc;

use cmd::CallArgs;
use error::CallError;

#[tokio::main]
async fn main() {
    let args = CallArgs::parse();
    init_tracing();

    match cmd::execute_call(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            report(&err);
            std::process::exit(err.exit_code());
        }
    }
}

/// Ambient diagnostics on stderr, level via RUST_LOG (default: warn).
/// Primary output and the verbose tracer do not go through here.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// Human-readable failure report with the cause chain.
fn report(err: &CallError) {
    eprintln!("a2a-call: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    if err.is_input_error() {
        eprintln!("  (items are key=value, key:=json or key:header; see --help)");
    }
}
