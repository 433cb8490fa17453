//! Sink that discards everything written to it.

use std::io;

use crate::ports::sink::OutputSink;

/// Swallows all output. Installed by the silencing operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write(&self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn signal_done(&self) {}

    fn kind(&self) -> &'static str {
        "null"
    }
}
