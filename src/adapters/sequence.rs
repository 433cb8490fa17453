//! Predictable path tokens.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::token::TokenSource;

/// Hands out `<label>-0`, `<label>-1`, ... in call order.
///
/// Used where the exact basename of a temporary path is asserted on.
pub struct SequenceTokens {
    label: String,
    next: AtomicU64,
}

impl SequenceTokens {
    /// Creates a source whose tokens start with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), next: AtomicU64::new(0) }
    }
}

impl TokenSource for SequenceTokens {
    fn next_token(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.label)
    }
}
