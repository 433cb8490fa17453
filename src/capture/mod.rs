//! Captured output: chunks, channels, and transcripts.

pub mod channel;
pub mod format;
pub mod transcript;

pub use channel::CaptureChannel;
pub use format::Chunk;
pub use transcript::{Transcript, TranscriptEntry};
