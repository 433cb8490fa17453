//! Temporary paths that are removed exactly once.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::path::{generate_unique_path, TempOptions};
use crate::completion::Release;
use crate::error::TempError;

/// What was set up at a temporary path before the body ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempKind {
    /// Only the name was reserved; nothing exists yet.
    Path,
    /// An empty directory was created.
    Directory,
}

/// A uniquely named path whose contents are removed when released.
///
/// Whatever ends up at the path (nothing, a file, or a directory tree) is
/// deleted on [`remove`](Self::remove) or on drop, whichever comes first.
/// A path that is already gone counts as removed.
#[derive(Debug)]
pub struct TempResource {
    path: PathBuf,
    kind: TempKind,
    removed: bool,
}

impl TempResource {
    /// Reserves a unique path without creating anything.
    #[must_use]
    pub fn reserve(options: &TempOptions) -> Self {
        Self { path: generate_unique_path(options), kind: TempKind::Path, removed: false }
    }

    /// Creates a fresh, empty directory at a unique path.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::Create`] if the directory cannot be created,
    /// including when something already exists at the generated path.
    pub fn create_dir(options: &TempOptions) -> Result<Self, TempError> {
        let path = generate_unique_path(options);
        fs::create_dir(&path).map_err(|source| TempError::Create { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "created temporary directory");
        Ok(Self { path, kind: TempKind::Directory, removed: false })
    }

    /// The temporary path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the path was prepared.
    #[must_use]
    pub const fn kind(&self) -> TempKind {
        self.kind
    }

    /// Deletes whatever exists at the path. Only the first call does any work.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::Remove`] if something exists at the path but
    /// cannot be deleted.
    pub fn remove(&mut self) -> Result<(), TempError> {
        if self.removed {
            return Ok(());
        }
        self.removed = true;
        remove_any(&self.path).map_err(|source| TempError::Remove { path: self.path.clone(), source })?;
        tracing::trace!(path = %self.path.display(), "removed temporary path");
        Ok(())
    }
}

impl Release for TempResource {
    type Error = TempError;

    fn release(&mut self) -> Result<(), TempError> {
        self.remove()
    }
}

impl Drop for TempResource {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            tracing::warn!(error = %err, "temporary path left behind");
        }
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    let removed = if metadata.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
    match removed {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
