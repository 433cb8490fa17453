//! Live script runner using `std::process::Command`.

use std::process::Command;

use crate::context::OutputContext;
use crate::error::ScriptError;
use crate::ports::shell::{ScriptOutcome, ScriptRunner};
use crate::ports::sink::Stream;

/// Runs scripts via `sh -c` and forwards their output to the ambient sinks.
///
/// The sinks are resolved when the script is started and held until its
/// output has been forwarded, so a capture active at that moment receives
/// all of it.
pub struct LiveScriptRunner;

impl ScriptRunner for LiveScriptRunner {
    fn run(&self, ctx: &OutputContext, script: &str) -> Result<ScriptOutcome, ScriptError> {
        let stdout = ctx.current(Stream::Stdout);
        let stderr = ctx.current(Stream::Stderr);

        tracing::debug!(script, "running script");
        let output = Command::new("sh")
            .arg("-c")
            .arg(script)
            .output()
            .map_err(|source| ScriptError::Spawn { command: script.to_string(), source })?;

        if !output.stdout.is_empty() {
            stdout
                .write(&output.stdout)
                .map_err(|source| ScriptError::Forward { stream: Stream::Stdout, source })?;
        }
        if !output.stderr.is_empty() {
            stderr
                .write(&output.stderr)
                .map_err(|source| ScriptError::Forward { stream: Stream::Stderr, source })?;
        }

        Ok(ScriptOutcome { exit_code: output.status.code().unwrap_or(-1) })
    }
}
