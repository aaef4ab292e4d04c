// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing secret lifecycle.

use std::fmt;
use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use sha2::{Digest, Sha256};

use super::fs::{create_if_absent, read_text, StorageError, StorageResult};
use super::StoragePaths;

/// Value written on first run. Operators MUST replace it.
pub const PLACEHOLDER_SECRET: &str = "SecretShouldBeChanged";

/// Symmetric HMAC key. Never empty, immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Arc<[u8]>);

impl Secret {
    /// Wrap raw key material. Returns `None` for an empty key.
    pub fn new(bytes: impl AsRef<[u8]>) -> Option<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            None
        } else {
            Some(Self(Arc::from(bytes)))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is still the first-run placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.as_bytes() == PLACEHOLDER_SECRET.as_bytes()
    }

    /// Short SHA-256 fingerprint, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        Base64UrlUnpadded::encode_string(&digest[..8])
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&"[REDACTED]").finish()
    }
}

/// Load the signing secret, writing the placeholder on first run.
///
/// Surrounding whitespace is trimmed so a trailing newline added by an editor
/// does not become part of the key. A second call reads the persisted value
/// and never rewrites the file.
pub fn load_or_initialize_secret(paths: &StoragePaths) -> StorageResult<Secret> {
    let path = paths.secret_file();

    let created = create_if_absent(&path, format!("{PLACEHOLDER_SECRET}\n").as_bytes())?;
    if created {
        tracing::warn!(
            path = %path.display(),
            "Created default signing secret, HIGHLY RECOMMEND CHANGING IT before production use"
        );
    }

    let text = read_text(&path)?;
    let secret = Secret::new(text.trim()).ok_or(StorageError::EmptySecret { path })?;

    if secret.is_placeholder() && !created {
        tracing::warn!("Signing secret is still the default placeholder");
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_secret_is_rejected() {
        assert!(Secret::new("").is_none());
        assert!(Secret::new(b"k").is_some());
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::new("super-secret").unwrap();
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn fingerprint_is_stable_and_distinct() {
        let a = Secret::new("a").unwrap();
        let b = Secret::new("b").unwrap();
        assert_eq!(a.fingerprint(), Secret::new("a").unwrap().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 11);
    }

    #[test]
    fn bootstrap_writes_default_once() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path().join("store"));

        let first = load_or_initialize_secret(&paths).unwrap();
        assert!(first.is_placeholder());
        assert!(paths.secret_file().exists());

        let modified = fs::metadata(paths.secret_file()).unwrap().modified().unwrap();
        let second = load_or_initialize_secret(&paths).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            fs::metadata(paths.secret_file()).unwrap().modified().unwrap(),
            modified
        );
    }

    #[test]
    fn operator_secret_is_read_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path());
        fs::write(paths.secret_file(), "  rotated-value\n").unwrap();

        let secret = load_or_initialize_secret(&paths).unwrap();
        assert_eq!(secret.as_bytes(), b"rotated-value");
        assert!(!secret.is_placeholder());
    }

    #[test]
    fn provisioned_secret_loads_without_touching_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path());
        fs::write(paths.secret_file(), "mounted-secret").unwrap();
        let dir_modified = fs::metadata(dir.path()).unwrap().modified().unwrap();

        let secret = load_or_initialize_secret(&paths).unwrap();
        assert_eq!(secret.as_bytes(), b"mounted-secret");
        assert_eq!(
            fs::metadata(dir.path()).unwrap().modified().unwrap(),
            dir_modified
        );
    }

    #[test]
    fn whitespace_only_secret_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path());
        fs::write(paths.secret_file(), "\n\n").unwrap();

        let result = load_or_initialize_secret(&paths);
        assert!(matches!(result, Err(StorageError::EmptySecret { .. })));
    }

    #[test]
    fn unreadable_location_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        let result = load_or_initialize_secret(&StoragePaths::new(&blocker));
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }
}
