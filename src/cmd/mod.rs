/*!
Command layer for the `a2a-call` binary.

One command, the call itself:
  call.rs    CallArgs + execute_call (parse -> build -> dispatch -> render)
  trace.rs   verbose traffic tracer (stderr)
  format.rs  stdout JSON formatting / TTY highlighting

Re-exports (public API expected by main.rs):
  - CallArgs, execute_call
*/

pub mod call;
pub mod format;
pub mod trace;

pub use call::{CallArgs, execute_call};
