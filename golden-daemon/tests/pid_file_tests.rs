//! PID file lifecycle: create, duplicate detection, removal.

use std::fs;

use golden_daemon::pid_file::{remove_pid_file, write_pid_file};
use tempfile::TempDir;

#[test]
fn test_pid_file_contains_current_pid() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("golden.pid");

    write_pid_file(&path).expect("should write PID file");

    let content = fs::read_to_string(&path).expect("should read PID file");
    assert_eq!(content.trim(), std::process::id().to_string());
}

#[test]
fn test_pid_file_creates_parent_directory() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("run").join("golden").join("golden.pid");

    write_pid_file(&path).expect("should create parents");
    assert!(path.exists());
}

#[test]
fn test_second_instance_is_refused() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("golden.pid");
    fs::write(&path, "4242\n").expect("seed PID file");

    let err = write_pid_file(&path).expect_err("existing PID file must be refused");
    assert!(err.to_string().contains("4242"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "4242\n");
}

#[test]
fn test_remove_pid_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("golden.pid");
    write_pid_file(&path).expect("should write PID file");

    remove_pid_file(&path);
    assert!(!path.exists());

    // removing again only logs
    remove_pid_file(&path);
}

#[cfg(unix)]
#[test]
fn test_pid_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("golden.pid");
    write_pid_file(&path).expect("should write PID file");

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
