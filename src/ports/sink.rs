//! Output sink port for the standard streams.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// One of the two standard output streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Stream {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Stdout => 0,
            Self::Stderr => 1,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Which streams a redirection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelector {
    /// Only standard output.
    Stdout,
    /// Only standard error.
    Stderr,
    /// Both streams, stdout installed first.
    Both,
}

impl StreamSelector {
    /// The streams covered by this selector, in install order.
    #[must_use]
    pub const fn streams(self) -> &'static [Stream] {
        match self {
            Self::Stdout => &[Stream::Stdout],
            Self::Stderr => &[Stream::Stderr],
            Self::Both => &[Stream::Stdout, Stream::Stderr],
        }
    }
}

/// A destination for output written to one of the standard streams.
///
/// Writers never hold on to a sink across scopes; they resolve the effective
/// sink from the ambient context each time they write.
pub trait OutputSink: Send + Sync {
    /// Writes raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Writes `text` followed by a newline as a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn write_line(&self, text: &str) -> io::Result<()> {
        let mut line = Vec::with_capacity(text.len() + 1);
        line.extend_from_slice(text.as_bytes());
        line.push(b'\n');
        self.write(&line)
    }

    /// Called once when the redirection that installed this sink is released.
    fn signal_done(&self);

    /// Short label used in log events.
    fn kind(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct VecSink(Mutex<Vec<Vec<u8>>>);

    impl OutputSink for VecSink {
        fn write(&self, bytes: &[u8]) -> io::Result<()> {
            self.0.lock().unwrap().push(bytes.to_vec());
            Ok(())
        }
        fn signal_done(&self) {}
        fn kind(&self) -> &'static str {
            "vec"
        }
    }

    #[test]
    fn write_line_is_one_write_with_newline() {
        let sink = VecSink(Mutex::new(Vec::new()));
        sink.write_line("hello").unwrap();
        assert_eq!(*sink.0.lock().unwrap(), vec![b"hello\n".to_vec()]);
    }

    #[test]
    fn both_selector_lists_stdout_first() {
        assert_eq!(StreamSelector::Both.streams(), &[Stream::Stdout, Stream::Stderr]);
        assert_eq!(StreamSelector::Stderr.streams(), &[Stream::Stderr]);
    }

    #[test]
    fn stream_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stream::Stderr).unwrap(), "\"stderr\"");
        assert_eq!(Stream::Stdout.to_string(), "stdout");
    }
}
