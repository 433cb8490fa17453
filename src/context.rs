//! Ambient output context: per-stream stacks of sink overrides.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::adapters::live::sink::RealSink;
use crate::error::OutputError;
use crate::ports::sink::{OutputSink, Stream};

struct Entry {
    id: u64,
    sink: Arc<dyn OutputSink>,
}

/// Proof that a sink was pushed; hand it back to [`OutputContext::pop`].
///
/// Tokens cannot be cloned, so each push is released at most once.
#[derive(Debug)]
#[must_use = "a pushed sink stays installed until its token is popped"]
pub struct SinkToken {
    stream: Stream,
    id: u64,
    previous: Option<u64>,
}

impl SinkToken {
    /// Stream the sink was pushed onto.
    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }

    /// Installer id of the pushed sink.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Per-stream stacks of sink overrides.
///
/// The top of each stack is the effective sink for that stream; when a
/// stack is empty the context's base sink is used. Writers look the sink up
/// on every write, so an override is seen by code that never asked for it.
///
/// Pushes and pops must nest. Popping anything other than the current top is
/// rejected with [`OutputError::OutOfOrder`] and leaves the stack untouched.
pub struct OutputContext {
    stacks: Mutex<[Vec<Entry>; 2]>,
    base: [Arc<dyn OutputSink>; 2],
    next_id: AtomicU64,
}

impl OutputContext {
    /// Creates a context whose base sinks are the real OS streams.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base(
            Arc::new(RealSink::new(Stream::Stdout)),
            Arc::new(RealSink::new(Stream::Stderr)),
        )
    }

    /// Creates a context with custom base sinks.
    #[must_use]
    pub fn with_base(stdout: Arc<dyn OutputSink>, stderr: Arc<dyn OutputSink>) -> Self {
        Self {
            stacks: Mutex::new([Vec::new(), Vec::new()]),
            base: [stdout, stderr],
            next_id: AtomicU64::new(1),
        }
    }

    /// The process-wide context used by the free-standing operations.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<OutputContext> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Installs `sink` as the effective sink for `stream`.
    pub fn push(&self, stream: Stream, sink: Arc<dyn OutputSink>) -> SinkToken {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let kind = sink.kind();
        let mut stacks = self.lock();
        let stack = &mut stacks[stream.index()];
        let previous = stack.last().map(|entry| entry.id);
        stack.push(Entry { id, sink });
        tracing::trace!(%stream, id, kind, depth = stack.len(), "pushed sink");
        SinkToken { stream, id, previous }
    }

    /// Removes the sink installed by `token`, restoring the one below it.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::OutOfOrder`] if `token` is not the top of its
    /// stack. The stack is left unchanged in that case.
    pub fn pop(&self, token: SinkToken) -> Result<(), OutputError> {
        let SinkToken { stream, id, previous } = token;
        let released = {
            let mut stacks = self.lock();
            let stack = &mut stacks[stream.index()];
            let top = stack.last().map(|entry| entry.id);
            if top != Some(id) {
                return Err(OutputError::OutOfOrder { stream, expected: id, found: top });
            }
            let released = stack.pop();
            debug_assert_eq!(stack.last().map(|entry| entry.id), previous);
            tracing::trace!(%stream, id, depth = stack.len(), "popped sink");
            released
        };
        // Dropped outside the lock: the last reference may close a capture.
        drop(released);
        Ok(())
    }

    /// The sink writes to `stream` currently resolve to.
    #[must_use]
    pub fn current(&self, stream: Stream) -> Arc<dyn OutputSink> {
        let stacks = self.lock();
        stacks[stream.index()]
            .last()
            .map_or_else(|| Arc::clone(&self.base[stream.index()]), |entry| Arc::clone(&entry.sink))
    }

    /// Number of overrides currently installed on `stream`.
    #[must_use]
    pub fn depth(&self, stream: Stream) -> usize {
        self.lock()[stream.index()].len()
    }

    /// Writes `bytes` to the current sink for `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current sink rejects the write.
    pub fn write(&self, stream: Stream, bytes: &[u8]) -> io::Result<()> {
        self.current(stream).write(bytes)
    }

    /// Writes `text` and a newline to the current sink for `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current sink rejects the write.
    pub fn write_line(&self, stream: Stream, text: &str) -> io::Result<()> {
        self.current(stream).write_line(text)
    }

    fn lock(&self) -> MutexGuard<'_, [Vec<Entry>; 2]> {
        // Stacks are only mutated by whole push/pop steps, so a poisoned
        // lock still guards consistent data.
        self.stacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a line to the current stdout sink of the global context.
///
/// # Errors
///
/// Returns an error if the current sink rejects the write.
pub fn echo(text: &str) -> io::Result<()> {
    OutputContext::global().write_line(Stream::Stdout, text)
}

/// Writes a line to the current stderr sink of the global context.
///
/// # Errors
///
/// Returns an error if the current sink rejects the write.
pub fn echo_err(text: &str) -> io::Result<()> {
    OutputContext::global().write_line(Stream::Stderr, text)
}
