//! Error types for redirection, capture, temporary resources, and scripts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ports::sink::Stream;

/// Misuse of the ambient output stacks.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A redirection was released while a different one was on top of its stack.
    #[error(
        "{stream} redirection #{expected} released out of order (top of stack is {})",
        describe_top(.found)
    )]
    OutOfOrder {
        /// Stream whose stack was being popped.
        stream: Stream,
        /// Installer id carried by the released token.
        expected: u64,
        /// Installer id actually on top, if any.
        found: Option<u64>,
    },
}

fn describe_top(found: &Option<u64>) -> String {
    found.map_or_else(|| "empty".to_string(), |id| format!("#{id}"))
}

/// Problems observing a capture channel.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A writer still holds the capturing sink, so the channel never closed.
    #[error("capture channel still open: {open} source(s) have live writers")]
    Unclosed {
        /// Number of merged sources that have not closed.
        open: usize,
    },
}

/// Failures creating or removing a scoped temporary resource.
#[derive(Debug, Error)]
pub enum TempError {
    /// The temporary directory could not be created.
    #[error("failed to create temporary directory {}: {source}", .path.display())]
    Create {
        /// Path that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Whatever was left at the temporary path could not be removed.
    #[error("failed to remove temporary path {}: {source}", .path.display())]
    Remove {
        /// Path that was being removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Failures running a script through the ambient sinks.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The shell process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// The script that was being run.
        command: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Forwarding script output to an ambient sink failed.
    #[error("failed to forward {stream} output: {source}")]
    Forward {
        /// Stream being forwarded.
        stream: Stream,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`OutputError`].
    #[error(transparent)]
    Output(#[from] OutputError),
    /// See [`CaptureError`].
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// See [`TempError`].
    #[error(transparent)]
    Temp(#[from] TempError),
    /// See [`ScriptError`].
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// Plain I/O failure while writing to a sink.
    #[error("output write failed: {0}")]
    Io(#[from] io::Error),
}

/// Result alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
