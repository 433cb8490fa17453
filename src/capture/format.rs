//! Captured output data structures.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::sink::Stream;

/// Process-wide arrival counter shared by every capturing sink.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A single write observed by a capturing sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Stream the write was aimed at.
    pub stream: Stream,
    /// Arrival order across all captures in the process.
    pub seq: u64,
    /// When the write happened.
    pub recorded_at: DateTime<Utc>,
    /// The bytes exactly as written.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Stamps `data` with the next arrival sequence number.
    #[must_use]
    pub fn new(stream: Stream, data: Vec<u8>) -> Self {
        Self {
            stream,
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
            recorded_at: Utc::now(),
            data,
        }
    }

    /// The chunk decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase_across_streams() {
        let first = Chunk::new(Stream::Stdout, b"a".to_vec());
        let second = Chunk::new(Stream::Stderr, b"b".to_vec());
        assert!(second.seq > first.seq);
    }

    #[test]
    fn text_is_lossy() {
        let chunk = Chunk::new(Stream::Stdout, vec![b'o', b'k', 0xff]);
        assert_eq!(chunk.text(), "ok\u{fffd}");
    }
}
