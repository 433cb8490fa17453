//! Unique path generation for temporary resources.

use std::path::PathBuf;

use crate::adapters::live::token::UuidTokens;
use crate::config::Config;
use crate::ports::token::TokenSource;

/// Naming and placement of a temporary path.
///
/// The generated path is `<parent>/<prefix><token><suffix>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempOptions {
    /// Text placed before the unique token.
    pub prefix: String,
    /// Text placed after the unique token, such as a file extension.
    pub suffix: String,
    /// Directory to place the path in; defaults to [`Config::temp_root`].
    pub parent: Option<PathBuf>,
}

impl TempOptions {
    /// Options with no prefix, no suffix, and the default parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the basename prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the basename suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the parent directory.
    #[must_use]
    pub fn parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    fn resolved_parent(&self) -> PathBuf {
        self.parent.clone().unwrap_or_else(|| Config::global().temp_root())
    }
}

/// Builds a fresh `<parent>/<prefix><token><suffix>` path. Nothing is created.
///
/// Tokens are random UUIDs, so concurrent calls in the same process do not
/// collide.
#[must_use]
pub fn generate_unique_path(options: &TempOptions) -> PathBuf {
    generate_unique_path_with(&UuidTokens, options)
}

/// [`generate_unique_path`] with tokens drawn from `tokens`.
#[must_use]
pub fn generate_unique_path_with(tokens: &dyn TokenSource, options: &TempOptions) -> PathBuf {
    let token = tokens.next_token();
    options.resolved_parent().join(format!("{}{token}{}", options.prefix, options.suffix))
}
