// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the gate's storage layout.

use std::path::{Path, PathBuf};

/// Default storage directory, relative to the working directory.
pub const DATA_ROOT: &str = "gate-data";

/// File holding the HMAC signing secret.
pub const SECRET_FILE: &str = "jwt_secret.txt";

/// File holding the JSON list of exempt request paths.
pub const EXEMPT_PATHS_FILE: &str = "exempt_paths.json";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted gate data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the signing secret.
    pub fn secret_file(&self) -> PathBuf {
        self.root.join(SECRET_FILE)
    }

    /// Path to the exempt path registry.
    pub fn exempt_paths_file(&self) -> PathBuf {
        self.root.join(EXEMPT_PATHS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_relative_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("gate-data"));
        assert_eq!(paths.secret_file(), PathBuf::from("gate-data/jwt_secret.txt"));
        assert_eq!(
            paths.exempt_paths_file(),
            PathBuf::from("gate-data/exempt_paths.json")
        );
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.secret_file(),
            PathBuf::from("/tmp/test-data/jwt_secret.txt")
        );
    }
}
