//! Serializable transcripts of captured output.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::Chunk;
use crate::ports::sink::Stream;

/// One captured write, decoded as text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Arrival order across all captures in the process.
    pub seq: u64,
    /// Stream the write was aimed at.
    pub stream: Stream,
    /// When the write happened.
    pub recorded_at: DateTime<Utc>,
    /// The written bytes, decoded lossily as UTF-8.
    pub text: String,
}

impl From<&Chunk> for TranscriptEntry {
    fn from(chunk: &Chunk) -> Self {
        Self {
            seq: chunk.seq,
            stream: chunk.stream,
            recorded_at: chunk.recorded_at,
            text: chunk.text().into_owned(),
        }
    }
}

/// A named record of everything a capture observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    /// Human-readable name for this transcript.
    pub name: String,
    /// When the transcript was assembled.
    pub recorded_at: DateTime<Utc>,
    /// Captured writes in arrival order.
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Builds a transcript from captured chunks, sorted by arrival.
    pub fn from_chunks(name: impl Into<String>, chunks: &[Chunk]) -> Self {
        let mut entries: Vec<TranscriptEntry> = chunks.iter().map(TranscriptEntry::from).collect();
        entries.sort_by_key(|entry| entry.seq);
        Self { name: name.into(), recorded_at: Utc::now(), entries }
    }

    /// Concatenated text of the entries written to `stream`.
    #[must_use]
    pub fn stream_text(&self, stream: Stream) -> String {
        self.entries
            .iter()
            .filter(|entry| entry.stream == stream)
            .map(|entry| entry.text.as_str())
            .collect()
    }

    /// Serializes the transcript as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the transcript as YAML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_yaml(&self, path: impl AsRef<Path>) -> Result<PathBuf, std::io::Error> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(path, yaml)?;
        Ok(path.to_path_buf())
    }

    /// Reads a YAML transcript from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(std::io::Error::other)
    }
}
