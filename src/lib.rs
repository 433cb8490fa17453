//! Ambient stdout/stderr redirection and scoped temporary paths.
//!
//! Output written through [`OutputContext`] goes to whatever sink is on top
//! of that stream's stack, so silencing or capturing a stream also covers
//! code that never asked for it, such as a nested script. Temporary paths
//! handed out by the [`temp`] helpers are removed on every exit path.

pub mod adapters;
pub mod capture;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;
pub mod redirect;
pub mod scope;
pub mod temp;

pub use capture::{CaptureChannel, Chunk, Transcript};
pub use completion::{settle, Completion, Release, SETTLE_ROUNDS};
pub use config::Config;
pub use context::{echo, echo_err, OutputContext, SinkToken};
pub use error::{CaptureError, Error, OutputError, Result, ScriptError, TempError};
pub use ports::{OutputSink, ScriptOutcome, ScriptRunner, Stream, StreamSelector};
pub use redirect::{
    capture_output, capture_output_async, capture_stderr, capture_stderr_async, capture_stdout,
    capture_stdout_async, silence_output, silence_output_async, silence_stderr,
    silence_stderr_async, silence_stdout, silence_stdout_async,
};
pub use scope::{Captured, RedirectGuard};
pub use temp::{
    generate_unique_path, with_temp_dir, with_temp_dir_async, with_temp_path,
    with_temp_path_async, TempOptions,
};

/// Runs `script` through `sh`, writing its output to the global context's
/// current sinks.
///
/// # Errors
///
/// Returns an error if the script cannot be started or its output cannot be
/// forwarded.
pub fn run_script(script: &str) -> std::result::Result<ScriptOutcome, ScriptError> {
    adapters::live::shell::LiveScriptRunner.run(OutputContext::global(), script)
}
