//! Live output sink writing to the process's real streams.

use std::io::{self, Write};

use crate::ports::sink::{OutputSink, Stream};

/// Writes straight to the OS stdout or stderr.
#[derive(Debug, Clone, Copy)]
pub struct RealSink {
    stream: Stream,
}

impl RealSink {
    /// Creates a sink for the given OS stream.
    #[must_use]
    pub const fn new(stream: Stream) -> Self {
        Self { stream }
    }
}

impl OutputSink for RealSink {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Stream::Stderr => io::stderr().lock().write_all(bytes),
        }
    }

    fn signal_done(&self) {
        let _ = match self.stream {
            Stream::Stdout => io::stdout().lock().flush(),
            Stream::Stderr => io::stderr().lock().flush(),
        };
    }

    fn kind(&self) -> &'static str {
        "real"
    }
}
