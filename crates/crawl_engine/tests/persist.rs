use std::fs;

use crawl_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn repeated_download_replaces_previous_copy() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("result.csv", b"a,b\n1,2\n").unwrap();
    assert_eq!(first.file_name().unwrap(), "result.csv");
    assert_eq!(fs::read(&first).unwrap(), b"a,b\n1,2\n");

    let second = writer.write("result.csv", b"a,b\n3,4\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"a,b\n3,4\n");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("result.csv", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("result.csv").exists());
}

#[test]
fn names_that_escape_the_directory_are_refused() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("downloads"));

    for name in ["../evil.csv", "..\\evil.csv", "..", ""] {
        let err = writer.write(name, b"x").unwrap_err();
        assert!(matches!(err, PersistError::UnsafeFilename(_)), "{name:?}");
    }
    assert!(!temp.path().join("evil.csv").exists());
}
