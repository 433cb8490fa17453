//! Lazy, closable sequences of captured chunks.

use std::collections::VecDeque;
use std::future::poll_fn;
use std::task::{Context, Poll};

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use super::format::Chunk;
use crate::error::CaptureError;

/// Output diverted by a capturing sink, in write order.
///
/// The channel closes once every reference to the capturing sink is gone:
/// the ambient stack entry, the scope that installed it, and any writer that
/// resolved it while the scope was active. Until then [`next`](Self::next)
/// waits for more output and [`finish`](Self::finish) reports the channel as
/// still open.
///
/// A channel built with [`merge`](Self::merge) yields chunks from several
/// streams ordered by arrival. Ordering across streams is best effort.
#[derive(Debug)]
pub struct CaptureChannel {
    sources: Vec<Source>,
}

#[derive(Debug)]
struct Source {
    rx: UnboundedReceiver<Chunk>,
    pending: VecDeque<Chunk>,
    closed: bool,
}

impl Source {
    fn pump(&mut self) {
        while !self.closed {
            match self.rx.try_recv() {
                Ok(chunk) => self.pending.push_back(chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.closed = true,
            }
        }
    }

    fn poll_fill(&mut self, cx: &mut Context<'_>) {
        self.pump();
        if self.pending.is_empty() && !self.closed {
            match self.rx.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => self.pending.push_back(chunk),
                Poll::Ready(None) => self.closed = true,
                Poll::Pending => {}
            }
        }
    }
}

impl CaptureChannel {
    pub(crate) fn new(rx: UnboundedReceiver<Chunk>) -> Self {
        Self { sources: vec![Source { rx, pending: VecDeque::new(), closed: false }] }
    }

    /// Interleaves this channel with `other` by arrival order.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.sources.extend(other.sources);
        self
    }

    /// Waits for the next chunk; `None` once the channel is closed and drained.
    pub async fn next(&mut self) -> Option<Chunk> {
        poll_fn(|cx| self.poll_next(cx)).await
    }

    /// Waits for the channel to close and returns every chunk.
    ///
    /// Never returns if a writer keeps the capturing sink alive; use
    /// [`finish`](Self::finish) to detect that instead.
    pub async fn collect(mut self) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next().await {
            chunks.push(chunk);
        }
        chunks
    }

    /// Waits for the channel to close and returns the output as text.
    pub async fn text(self) -> String {
        join_text(&self.collect().await)
    }

    /// Returns `true` once every writer has released the capturing sink.
    ///
    /// A receiver only reports disconnection after its queued chunks are
    /// taken, so this moves whatever has arrived into the channel's buffer
    /// first; hence `&mut self`. Nothing is consumed: the buffered chunks are
    /// still returned by [`next`](Self::next) and [`finish`](Self::finish).
    pub fn is_closed(&mut self) -> bool {
        self.sources.iter_mut().all(|source| {
            source.pump();
            source.closed
        })
    }

    /// Returns all chunks without waiting, provided the channel has closed.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Unclosed`] if some writer still holds the
    /// capturing sink. Buffered chunks are kept for a later call.
    pub fn finish(&mut self) -> Result<Vec<Chunk>, CaptureError> {
        for source in &mut self.sources {
            source.pump();
        }
        let open = self.sources.iter().filter(|source| !source.closed).count();
        if open > 0 {
            return Err(CaptureError::Unclosed { open });
        }
        Ok(std::iter::from_fn(|| self.take_earliest()).collect())
    }

    /// [`finish`](Self::finish), decoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Unclosed`] if some writer still holds the
    /// capturing sink.
    pub fn finish_text(&mut self) -> Result<String, CaptureError> {
        self.finish().map(|chunks| join_text(&chunks))
    }

    fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<Chunk>> {
        for source in &mut self.sources {
            source.poll_fill(cx);
        }
        if let Some(chunk) = self.take_earliest() {
            return Poll::Ready(Some(chunk));
        }
        if self.sources.iter().all(|source| source.closed) {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }

    fn take_earliest(&mut self) -> Option<Chunk> {
        let (_, index) = self
            .sources
            .iter()
            .enumerate()
            .filter_map(|(index, source)| source.pending.front().map(|chunk| (chunk.seq, index)))
            .min()?;
        self.sources[index].pending.pop_front()
    }
}

fn join_text(chunks: &[Chunk]) -> String {
    let bytes: Vec<u8> = chunks.iter().flat_map(|chunk| chunk.data.iter().copied()).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
