use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tsync_fs::{Error, NormalizedPath, io};

#[test]
fn test_write_atomic_creates_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("index.zh.json"));

    io::write_atomic(&path, "[]".as_bytes()).unwrap();

    temp.child("index.zh.json").assert("[]");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("index.ja.json");
    file.write_str("original").unwrap();

    io::write_atomic(&NormalizedPath::new(file.path()), b"updated").unwrap();

    file.assert("updated");
}

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/dir/index.json"));

    io::write_text(&path, "{}").unwrap();

    temp.child("nested/dir/index.json").assert(predicate::path::is_file());
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("index.ko.json"));

    io::write_text(&path, "[]").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["index.ko.json".to_string()]);
}

#[test]
fn test_read_text_preserves_unicode() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("index.zh.json");
    file.write_str("猫咪生成器").unwrap();

    let content = io::read_text(&NormalizedPath::new(file.path())).unwrap();
    assert_eq!(content, "猫咪生成器");
}

#[test]
fn test_read_text_nonexistent_file() {
    let result = io::read_text(&NormalizedPath::new("/nonexistent/index.json"));
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn test_copy_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("index.fr.json");
    source.write_str("[1]").unwrap();

    let dest = NormalizedPath::new(temp.path().join("backups/run/index.fr.json"));
    io::copy_file(&NormalizedPath::new(source.path()), &dest).unwrap();

    temp.child("backups/run/index.fr.json").assert("[1]");
}
