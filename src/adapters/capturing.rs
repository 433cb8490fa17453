//! Sink that diverts output into a capture channel.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};

use crate::capture::{CaptureChannel, Chunk};
use crate::ports::sink::{OutputSink, Stream};

/// Buffers every write as a [`Chunk`] for a paired [`CaptureChannel`].
///
/// The channel stays open for as long as any `Arc` to this sink exists.
pub struct CaptureSink {
    stream: Stream,
    tx: UnboundedSender<Chunk>,
    done: AtomicBool,
}

impl CaptureSink {
    /// Creates a capturing sink for `stream` and the channel that observes it.
    #[must_use]
    pub fn channel(stream: Stream) -> (Arc<Self>, CaptureChannel) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(Self { stream, tx, done: AtomicBool::new(false) });
        (sink, CaptureChannel::new(rx))
    }

    /// Returns `true` once the redirection that installed this sink was released.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

impl OutputSink for CaptureSink {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if self.is_done() {
            tracing::debug!(stream = %self.stream, "late write reached a released capture");
        }
        if self.tx.send(Chunk::new(self.stream, bytes.to_vec())).is_err() {
            tracing::trace!(stream = %self.stream, "capture channel dropped, discarding write");
        }
        Ok(())
    }

    fn signal_done(&self) {
        self.done.store(true, Ordering::Release);
    }

    fn kind(&self) -> &'static str {
        "capture"
    }
}
