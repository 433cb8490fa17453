//! Scoped temporary paths and directories.
//!
//! Each helper hands the body a fresh, uniquely named path and deletes
//! whatever is at that path once the body is done. Deletion runs whether the
//! body succeeds, returns an error, or panics, and for the `_async` variants
//! it waits until the body's future resolves. The body's own result is always
//! what the caller gets back; a failed deletion only surfaces as an error
//! when the body itself succeeded.

pub mod path;
pub mod resource;

use std::future::Future;
use std::path::{Path, PathBuf};

pub use path::{generate_unique_path, generate_unique_path_with, TempOptions};
pub use resource::{TempKind, TempResource};

use crate::completion::{Completion, Release};
use crate::error::TempError;

/// Runs `body` with a unique path that does not exist yet, then deletes it.
///
/// # Errors
///
/// Returns the body's error unchanged, or the removal error converted into
/// `E` if the body succeeded but cleanup failed.
pub fn with_temp_path<T, E>(
    options: &TempOptions,
    body: impl FnOnce(&Path) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<TempError>,
{
    let mut resource = TempResource::reserve(options);
    let outcome = body(resource.path());
    let cleanup = resource.release();
    resolve(outcome, cleanup)
}

/// Runs `body` with a freshly created empty directory, then deletes it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the body's error
/// unchanged, or the removal error if the body succeeded but cleanup failed.
pub fn with_temp_dir<T, E>(
    options: &TempOptions,
    body: impl FnOnce(&Path) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<TempError>,
{
    let mut resource = TempResource::create_dir(options)?;
    let outcome = body(resource.path());
    let cleanup = resource.release();
    resolve(outcome, cleanup)
}

/// Like [`with_temp_path`], deleting the path once the body's future resolves.
///
/// # Errors
///
/// Returns the body's error unchanged, or the removal error converted into
/// `E` if the body succeeded but cleanup failed.
pub async fn with_temp_path_async<T, E, F>(
    options: &TempOptions,
    body: impl FnOnce(PathBuf) -> F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TempError>,
{
    let mut resource = TempResource::reserve(options);
    let future = body(resource.path().to_path_buf());
    let (outcome, cleanup) = Completion::pending(future).finish(&mut resource).await;
    resolve(outcome, cleanup)
}

/// Like [`with_temp_dir`], deleting the directory once the body's future resolves.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the body's error
/// unchanged, or the removal error if the body succeeded but cleanup failed.
pub async fn with_temp_dir_async<T, E, F>(
    options: &TempOptions,
    body: impl FnOnce(PathBuf) -> F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TempError>,
{
    let mut resource = TempResource::create_dir(options)?;
    let future = body(resource.path().to_path_buf());
    let (outcome, cleanup) = Completion::pending(future).finish(&mut resource).await;
    resolve(outcome, cleanup)
}

fn resolve<T, E: From<TempError>>(outcome: Result<T, E>, cleanup: Result<(), TempError>) -> Result<T, E> {
    match (outcome, cleanup) {
        (outcome, Ok(())) => outcome,
        (Ok(_), Err(cleanup)) => Err(cleanup.into()),
        (Err(err), Err(cleanup)) => {
            tracing::warn!(error = %cleanup, "cleanup failed after body error");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;
    use std::io;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("{0}")]
        Body(&'static str),
        #[error(transparent)]
        Temp(#[from] TempError),
    }

    fn under(root: &tempfile::TempDir) -> TempOptions {
        TempOptions::new().parent(root.path())
    }

    #[test]
    fn temp_path_returns_body_value_and_removes_file() {
        let root = tempfile::tempdir().unwrap();
        let seen = RefCell::new(PathBuf::new());

        let value = with_temp_path(&under(&root), |path| {
            assert!(!path.exists());
            fs::write(path, "hello!")?;
            seen.replace(path.to_path_buf());
            Ok::<_, TestError>(123)
        });

        assert_eq!(value.unwrap(), 123);
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn temp_dir_exists_empty_and_is_removed_on_error() {
        let root = tempfile::tempdir().unwrap();
        let seen = RefCell::new(PathBuf::new());

        let result: Result<(), TestError> = with_temp_dir(&under(&root), |dir| {
            assert!(dir.is_dir());
            assert_eq!(fs::read_dir(dir).unwrap().count(), 0);
            fs::write(dir.join("f.txt"), "x").unwrap();
            seen.replace(dir.to_path_buf());
            Err(TestError::Body("oh no"))
        });

        assert_eq!(result.unwrap_err().to_string(), "oh no");
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn temp_dir_removed_when_body_panics() {
        let root = tempfile::tempdir().unwrap();
        let seen = RefCell::new(PathBuf::new());

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_temp_dir(&under(&root), |dir| -> Result<(), TestError> {
                fs::create_dir(dir.join("nested")).unwrap();
                seen.replace(dir.to_path_buf());
                panic!("body blew up");
            })
        }));

        assert!(outcome.is_err());
        assert!(!seen.borrow().as_os_str().is_empty());
        assert!(!seen.borrow().exists());
    }

    #[test]
    fn nested_calls_get_distinct_paths() {
        let root = tempfile::tempdir().unwrap();
        let options = under(&root);
        let mut paths = Vec::new();

        with_temp_path(&options, |outer| {
            paths.push(outer.to_path_buf());
            with_temp_dir(&options, |inner| {
                paths.push(inner.to_path_buf());
                with_temp_path(&options, |innermost| {
                    paths.push(innermost.to_path_buf());
                    Ok::<_, TestError>(())
                })
            })
        })
        .unwrap();
        for _ in 0..5 {
            with_temp_path(&options, |path| {
                paths.push(path.to_path_buf());
                Ok::<_, TestError>(())
            })
            .unwrap();
        }

        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());
        assert!(paths.iter().all(|path| !path.exists()));
    }

    #[test]
    fn options_are_reflected_in_basename() {
        let root = tempfile::tempdir().unwrap();
        let options = under(&root).prefix("job-").suffix(".log");

        with_temp_path(&options, |path| {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("job-"));
            assert!(name.ends_with(".log"));
            assert_eq!(path.parent().unwrap(), root.path());
            Ok::<_, TestError>(())
        })
        .unwrap();
    }

    #[test]
    fn missing_parent_reports_create_error() {
        let root = tempfile::tempdir().unwrap();
        let options = TempOptions::new().parent(root.path().join("nope"));
        let result = with_temp_dir(&options, |_| Ok::<_, TestError>(()));
        assert!(matches!(result, Err(TestError::Temp(TempError::Create { .. }))));
    }

    #[test]
    fn cleanup_error_surfaces_only_without_body_error() {
        let removal = || TempError::Remove {
            path: PathBuf::from("/x"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };

        let ok: Result<u8, TestError> = resolve(Ok(1), Err(removal()));
        assert!(matches!(ok, Err(TestError::Temp(TempError::Remove { .. }))));

        let failed: Result<u8, TestError> = resolve(Err(TestError::Body("first")), Err(removal()));
        assert_eq!(failed.unwrap_err().to_string(), "first");
    }

    #[tokio::test]
    async fn async_path_kept_until_future_resolves() {
        let root = tempfile::tempdir().unwrap();

        let (value, path) = with_temp_path_async(&under(&root), |path| async move {
            tokio::task::yield_now().await;
            fs::write(&path, "later")?;
            tokio::task::yield_now().await;
            assert_eq!(fs::read_to_string(&path)?, "later");
            Ok::<_, TestError>((7, path))
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn async_dir_removed_after_rejection() {
        let root = tempfile::tempdir().unwrap();
        let seen = std::sync::Mutex::new(PathBuf::new());

        let result: Result<(), TestError> = with_temp_dir_async(&under(&root), |dir| {
            *seen.lock().unwrap() = dir.clone();
            async move {
                tokio::task::yield_now().await;
                fs::create_dir_all(dir.join("a/b")).unwrap();
                fs::write(dir.join("a/b/c"), "deep").unwrap();
                Err(TestError::Body("rejected"))
            }
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "rejected");
        assert!(!seen.lock().unwrap().exists());
    }

    impl From<io::Error> for TestError {
        fn from(_: io::Error) -> Self {
            Self::Body("io")
        }
    }
}
