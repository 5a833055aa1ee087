//! Package manager behavior exercised against a scripted stand-in binary.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use dashtop_engine::pkg::{PackageKind, PackageManager};
use dashtop_engine::EngineError;

fn script(dir: &Path, body: &str) -> String {
    let path = dir.join("fakebrew");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn install_while_busy_is_rejected_not_queued() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = PackageManager::with_binary(script(dir.path(), "sleep 1"));

    let slow = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.install("ripgrep", PackageKind::Formula).await })
    };
    // Let the first operation claim the gate.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(mgr.is_busy());

    let second = mgr.install("fd", PackageKind::Formula).await;
    assert!(matches!(second, Err(EngineError::Busy(_))));

    // The original operation is unaffected and releases the gate.
    slow.await.unwrap().unwrap();
    assert!(!mgr.is_busy());
}

#[tokio::test]
async fn failing_operation_reports_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = PackageManager::with_binary(script(dir.path(), "exit 3"));

    let err = mgr
        .uninstall("nothing", PackageKind::Formula)
        .await
        .unwrap_err();
    match err {
        EngineError::CommandFailed { status, cmd } => {
            assert_eq!(status, 3);
            assert!(cmd.contains("uninstall nothing"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // A failed operation must release the gate.
    assert!(!mgr.is_busy());
}

#[tokio::test]
async fn cask_operations_pass_the_cask_flag() {
    let dir = tempfile::tempdir().unwrap();
    // Succeeds only when invoked as `install --cask <name>`.
    let body = r#"[ "$1" = "install" ] && [ "$2" = "--cask" ] && [ -n "$3" ] && exit 0
exit 9"#;
    let mgr = PackageManager::with_binary(script(dir.path(), body));

    assert!(mgr.install("firefox", PackageKind::Cask).await.is_ok());
    assert!(mgr.install("ripgrep", PackageKind::Formula).await.is_err());
}

#[tokio::test]
async fn listing_merges_formulas_and_casks() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"case "$2" in
  --formula) printf 'ripgrep\njq\n' ;;
  --cask) printf 'firefox\n' ;;
esac"#;
    let mgr = PackageManager::with_binary(script(dir.path(), body));

    let list = mgr.list_installed().await;
    assert_eq!(list.len(), 3);
    assert!(list
        .iter()
        .any(|p| p.name == "ripgrep" && p.kind == PackageKind::Formula));
    assert!(list
        .iter()
        .any(|p| p.name == "firefox" && p.kind == PackageKind::Cask));
}

#[tokio::test]
async fn availability_follows_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = PackageManager::with_binary(script(dir.path(), "exit 0"));
    assert!(mgr.available().await);

    let missing = PackageManager::with_binary("/nonexistent/fakebrew");
    assert!(!missing.available().await);
    assert!(missing.list_installed().await.is_empty());
}
