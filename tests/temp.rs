//! Integration tests for scoped temporary paths.

use std::fs;
use std::path::PathBuf;

use shellscope::{
    generate_unique_path, with_temp_dir, with_temp_dir_async, with_temp_path,
    with_temp_path_async, TempError, TempOptions,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[test]
fn temp_path_example() {
    let mut seen = PathBuf::new();
    let value = with_temp_path(&TempOptions::new(), |path| {
        fs::write(path, "hello!")?;
        seen = path.to_path_buf();
        Ok::<_, BoxError>(123)
    })
    .unwrap();

    assert_eq!(value, 123);
    assert!(!seen.exists());
}

#[test]
fn temp_dir_example() {
    let mut seen = PathBuf::new();
    let result = with_temp_dir(&TempOptions::new().prefix("example-"), |dir| {
        fs::write(dir.join("f.txt"), "x")?;
        seen = dir.to_path_buf();
        Err::<(), BoxError>("oh no".into())
    });

    assert_eq!(result.unwrap_err().to_string(), "oh no");
    assert!(!seen.exists());
}

#[test]
fn temp_errors_convert_into_boxed_errors() {
    let missing = generate_unique_path(&TempOptions::new());
    let result = with_temp_dir(&TempOptions::new().parent(missing), |_| Ok::<_, BoxError>(()));
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<TempError>().is_some());
}

#[tokio::test]
async fn async_helpers_clean_up_after_success_and_failure() {
    let root = tempfile::tempdir().unwrap();
    let options = TempOptions::new().parent(root.path()).suffix(".d");

    let kept = with_temp_dir_async(&options, |dir| async move {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        fs::write(dir.join("inside"), "data")?;
        Ok::<_, BoxError>(dir)
    })
    .await
    .unwrap();
    assert!(!kept.exists());

    let failed = with_temp_path_async(&options, |path| async move {
        fs::create_dir(&path)?;
        fs::write(path.join("nested"), "data")?;
        tokio::task::yield_now().await;
        Err::<(), BoxError>(format!("failed at {}", path.display()).into())
    })
    .await;
    assert!(failed.is_err());
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn cancelled_body_still_cleans_up() {
    let root = tempfile::tempdir().unwrap();
    let options = TempOptions::new().parent(root.path());
    let (tx, rx) = tokio::sync::oneshot::channel();

    let pending = with_temp_dir_async(&options, |dir| async move {
        fs::write(dir.join("f"), "x")?;
        tx.send(dir).ok();
        std::future::pending::<()>().await;
        Ok::<_, BoxError>(())
    });
    let timed_out =
        tokio::time::timeout(std::time::Duration::from_millis(5), pending).await.is_err();

    assert!(timed_out);
    let dir = rx.await.unwrap();
    assert!(!dir.exists());
}
