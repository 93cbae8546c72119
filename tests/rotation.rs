//! Tests for the rotating file output.

use flate2::read::GzDecoder;
use sharedlog::{Output, RotatingFile, RotationPolicy};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const KB: usize = 1024;

fn chunk(byte: u8) -> Vec<u8> {
    let mut buf = vec![byte; 600 * KB];
    buf.push(b'\n');
    buf
}

fn backups(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("app-"))
        })
        .collect();
    found.sort();
    found
}

#[test]
fn creates_file_lazily() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path));
    assert!(!path.exists());

    file.write(b"hello\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
}

#[test]
fn appends_to_existing_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    fs::write(&path, "old\n").unwrap();

    let file = RotatingFile::new(RotationPolicy::new(&path).max_size(1));
    file.write(b"new\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    assert!(backups(tmp.path()).is_empty());
}

#[test]
fn rotates_when_size_exceeded() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path).max_size(1));

    file.write(&chunk(b'a')).unwrap();
    assert!(backups(tmp.path()).is_empty());

    file.write(&chunk(b'b')).unwrap();
    let rotated = backups(tmp.path());
    assert_eq!(rotated.len(), 1);
    assert!(fs::read(&rotated[0]).unwrap().starts_with(b"aaa"));
    assert!(fs::read(&path).unwrap().starts_with(b"bbb"));
}

#[test]
fn keeps_at_most_max_backups() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path).max_size(1).max_backups(2));

    for byte in [b'a', b'b', b'c', b'd', b'e'] {
        file.write(&chunk(byte)).unwrap();
    }
    file.wait_for_retention();

    let rotated = backups(tmp.path());
    assert_eq!(rotated.len(), 2);
    // oldest ('a', 'b') were pruned
    assert!(fs::read(&rotated[0]).unwrap().starts_with(b"ccc"));
    assert!(fs::read(&rotated[1]).unwrap().starts_with(b"ddd"));
    assert!(fs::read(&path).unwrap().starts_with(b"eee"));
}

#[test]
fn compresses_rotated_files() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path).max_size(1).compress(true));

    file.write(&chunk(b'a')).unwrap();
    file.write(&chunk(b'b')).unwrap();
    file.wait_for_retention();

    let rotated = backups(tmp.path());
    assert_eq!(rotated.len(), 1);
    assert!(rotated[0].to_string_lossy().ends_with(".log.gz"));

    let mut decoded = Vec::new();
    GzDecoder::new(fs::File::open(&rotated[0]).unwrap())
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, chunk(b'a'));
}

#[test]
fn removes_backups_older_than_max_age() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let stale = tmp.path().join("app-2000-01-01T00-00-00.000.log");
    fs::write(&stale, "ancient\n").unwrap();
    let unrelated = tmp.path().join("other-2000-01-01T00-00-00.000.log");
    fs::write(&unrelated, "not ours\n").unwrap();

    let file = RotatingFile::new(RotationPolicy::new(&path).max_age(1));
    file.write(b"first\n").unwrap();
    file.rotate().unwrap();
    file.wait_for_retention();

    assert!(!stale.exists());
    assert!(unrelated.exists());
    assert_eq!(backups(tmp.path()).len(), 1);
}

#[test]
fn rapid_rotations_never_overwrite_backups() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path));

    for i in 0..3 {
        file.write(format!("gen {i}\n").as_bytes()).unwrap();
        file.rotate().unwrap();
    }

    assert_eq!(backups(tmp.path()).len(), 3);
}

#[test]
fn rejects_write_larger_than_max_size() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(RotationPolicy::new(&path).max_size(1));

    let too_big = vec![b'x'; 2 * 1024 * KB];
    assert!(file.write(&too_big).is_err());
    assert!(!path.exists());
}

#[test]
fn zero_max_size_means_hundred_megabytes() {
    let policy = RotationPolicy::new("app.log");
    assert_eq!(policy.max_bytes(), 100 * 1024 * 1024);
    assert_eq!(policy.max_size(3).max_bytes(), 3 * 1024 * 1024);
}

#[test]
fn retention_runs_off_the_writing_thread() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let file = RotatingFile::new(
        RotationPolicy::new(&path)
            .max_size(1)
            .max_backups(3)
            .compress(true),
    );

    for byte in b'a'..=b'h' {
        file.write(&chunk(byte)).unwrap();
    }
    file.wait_for_retention();

    // every requested pass has finished: pruned to the limit, all compressed
    let rotated = backups(tmp.path());
    assert_eq!(rotated.len(), 3);
    assert!(rotated.iter().all(|p| p.to_string_lossy().ends_with(".log.gz")));
    assert!(fs::read(&path).unwrap().starts_with(b"hhh"));

    let mut newest = Vec::new();
    GzDecoder::new(fs::File::open(&rotated[2]).unwrap())
        .read_to_end(&mut newest)
        .unwrap();
    assert_eq!(newest, chunk(b'g'));
}

#[test]
fn waiting_without_retention_returns_immediately() {
    let tmp = TempDir::new().unwrap();
    let file = RotatingFile::new(RotationPolicy::new(tmp.path().join("app.log")));
    file.wait_for_retention();
    file.write(b"line\n").unwrap();
    file.rotate().unwrap();
    file.wait_for_retention();
    assert_eq!(backups(tmp.path()).len(), 1);
}
