//! Temporary file helpers for tests that load configuration from disk.

use std::fs;
use std::path::PathBuf;

/// Create a temporary directory that is removed when dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("field-imagery-test-")
        .tempdir()
        .expect("Failed to create temp directory")
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_test_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}
