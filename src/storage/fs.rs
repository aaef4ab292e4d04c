// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem primitives shared by the secret store and the exemption registry.
//!
//! Both stores follow the same load-or-initialize pattern: make sure the
//! storage directory exists, publish a default file if none is present, then
//! read whatever is on disk. Publishing goes through a uniquely-named
//! temporary file that is hard-linked into place, so concurrent initializers
//! never observe a partially written file and never clobber each other.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Error type for persisted gate state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Directory or file could not be created, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// File contents could not be (de)serialized.
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The secret file exists but holds nothing usable.
    #[error("secret file {} is empty; give it a value", .path.display())]
    EmptySecret { path: PathBuf },
}

impl StorageError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> Self + '_ {
        move |source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create a directory (including parents). Idempotent.
pub fn ensure_dir(dir: &Path) -> StorageResult<()> {
    fs::create_dir_all(dir).map_err(StorageError::io(dir))
}

/// Publish `data` at `path` unless a file is already there.
///
/// Returns `true` if this call created the file, `false` if it already existed.
/// An existing file is never rewritten, and its directory is not touched, so a
/// populated read-only directory loads fine.
pub fn create_if_absent(path: &Path, data: &[u8]) -> StorageResult<bool> {
    match fs::metadata(path) {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(StorageError::io(path)(e)),
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
    {
        let mut file = File::create(&temp_path).map_err(StorageError::io(&temp_path))?;
        file.write_all(data).map_err(StorageError::io(&temp_path))?;
        file.sync_all().map_err(StorageError::io(&temp_path))?;
    }

    // hard_link fails atomically when the target exists
    let published = match fs::hard_link(&temp_path, path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    };
    if let Err(e) = fs::remove_file(&temp_path) {
        tracing::debug!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
    }

    published.map_err(StorageError::io(path))
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(StorageError::io(path))
}

/// Read a JSON file and deserialize it.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(StorageError::json(path))
}

/// Serialize `value` as pretty JSON and publish it unless `path` exists.
pub fn create_json_if_absent<T: Serialize>(path: &Path, value: &T) -> StorageResult<bool> {
    let mut data = serde_json::to_vec_pretty(value).map_err(StorageError::json(path))?;
    data.push(b'\n');
    create_if_absent(path, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn create_if_absent_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("value.txt");

        assert!(create_if_absent(&path, b"first").unwrap());
        assert!(!create_if_absent(&path, b"second").unwrap());
        assert_eq!(read_text(&path).unwrap(), "first");
    }

    #[test]
    fn create_if_absent_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.txt");

        create_if_absent(&path, b"data").unwrap();
        create_if_absent(&path, b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn existing_file_is_left_alone_without_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.txt");
        fs::write(&path, "operator").unwrap();
        let dir_modified = fs::metadata(dir.path()).unwrap().modified().unwrap();

        assert!(!create_if_absent(&path, b"default").unwrap());

        assert_eq!(read_text(&path).unwrap(), "operator");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        // no temp file was created and removed in the directory
        assert_eq!(
            fs::metadata(dir.path()).unwrap().modified().unwrap(),
            dir_modified
        );
    }

    #[test]
    fn json_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let data = TestData {
            id: "a".to_string(),
            value: 7,
        };

        create_json_if_absent(&path, &data).unwrap();
        let read: TestData = read_json(&path).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_text(&path).unwrap_err();
        assert!(matches!(err, StorageError::Io { ref path, .. } if path.ends_with("missing.txt")));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result = read_json::<TestData>(&path);
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }
}
