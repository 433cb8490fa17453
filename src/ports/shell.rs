//! Script runner port for executing scripts whose output goes through the
//! ambient sinks.

use crate::context::OutputContext;
use crate::error::ScriptError;

/// The result of running a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
}

impl ScriptOutcome {
    /// Returns `true` when the script exited with code zero.
    #[must_use]
    pub const fn success(self) -> bool {
        self.exit_code == 0
    }
}

/// Runs scripts and writes everything they print through `ctx`.
///
/// Implementations must not write to the OS streams directly, so that
/// silencing or capturing the ambient context also covers nested scripts.
pub trait ScriptRunner: Send + Sync {
    /// Runs `script` and forwards its stdout and stderr to the current sinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be started or its output cannot
    /// be forwarded.
    fn run(&self, ctx: &OutputContext, script: &str) -> Result<ScriptOutcome, ScriptError>;
}
