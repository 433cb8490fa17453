//! Environment-driven configuration.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Settings read from the environment (and a `.env` file, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory new temporary paths are placed under by default.
    pub temp_root: Option<PathBuf>,
    /// `tracing` filter directive used by [`crate::logging::init`].
    pub log_filter: String,
}

impl Config {
    /// Overrides the default parent directory for temporary paths.
    pub const TEMP_ROOT_VAR: &'static str = "SHELLSCOPE_TMPDIR";
    /// Filter directive for log output, e.g. `shellscope=debug`.
    pub const LOG_VAR: &'static str = "SHELLSCOPE_LOG";
    /// Filter used when [`Self::LOG_VAR`] is unset.
    pub const DEFAULT_LOG_FILTER: &'static str = "warn";

    /// Reads configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to values.
    ///
    /// A temp root that is empty or not an existing directory is ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let temp_root = lookup(Self::TEMP_ROOT_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .filter(|path| {
                let usable = path.is_dir();
                if !usable {
                    tracing::warn!(
                        path = %path.display(),
                        "{} is not a directory, using the system temp dir",
                        Self::TEMP_ROOT_VAR
                    );
                }
                usable
            });
        let log_filter = lookup(Self::LOG_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_LOG_FILTER.to_string());
        Self { temp_root, log_filter }
    }

    /// Configuration loaded once for the whole process.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Config> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Parent directory for temporary paths when none is given explicitly.
    #[must_use]
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { temp_root: None, log_filter: Self::DEFAULT_LOG_FILTER.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.temp_root(), std::env::temp_dir());
    }

    #[test]
    fn uses_existing_temp_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap().to_string();
        let config = Config::from_lookup(lookup_from(&[
            (Config::TEMP_ROOT_VAR, root.as_str()),
            (Config::LOG_VAR, "shellscope=trace"),
        ]));
        assert_eq!(config.temp_root(), dir.path());
        assert_eq!(config.log_filter, "shellscope=trace");
    }

    #[test]
    fn ignores_missing_temp_root() {
        let config =
            Config::from_lookup(lookup_from(&[(Config::TEMP_ROOT_VAR, "/definitely/not/here")]));
        assert!(config.temp_root.is_none());
    }
}
