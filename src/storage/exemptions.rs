// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registry of request paths that bypass authentication.

use serde::{Deserialize, Serialize};

use super::fs::{create_json_if_absent, read_json, StorageResult};
use super::StoragePaths;

/// Paths written on first run: callers cannot hold a token before logging in.
pub const DEFAULT_EXEMPT_PATHS: [&str; 2] = ["/api/User/Login", "/api/User/Register"];

/// A single exempt request path. Matches by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptPath {
    pub path: String,
}

impl ExemptPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn matches(&self, request_path: &str) -> bool {
        self.path == request_path
    }
}

/// Exempt paths loaded once at startup. Membership test only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExemptPathSet(Vec<ExemptPath>);

impl ExemptPathSet {
    pub fn new(paths: impl IntoIterator<Item = ExemptPath>) -> Self {
        Self(paths.into_iter().collect())
    }

    /// The first-run default: login and registration.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_EXEMPT_PATHS.into_iter().map(ExemptPath::new))
    }

    /// An empty set, under which every path requires a credential.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, request_path: &str) -> bool {
        self.0.iter().any(|p| p.matches(request_path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExemptPath> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ExemptPath> for ExemptPathSet {
    fn from_iter<I: IntoIterator<Item = ExemptPath>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Load the exempt path registry, writing the defaults on first run.
pub fn load_or_initialize_exempt_paths(paths: &StoragePaths) -> StorageResult<ExemptPathSet> {
    let path = paths.exempt_paths_file();

    if create_json_if_absent(&path, &ExemptPathSet::defaults())? {
        tracing::info!(path = %path.display(), "Created default exempt path registry");
    }

    let set: ExemptPathSet = read_json(&path)?;
    tracing::debug!(count = set.len(), "Loaded exempt paths");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use std::fs;

    #[test]
    fn membership_is_exact_match() {
        let set = ExemptPathSet::defaults();
        assert!(set.contains("/api/User/Login"));
        assert!(set.contains("/api/User/Register"));
        assert!(!set.contains("/api/User/Login/"));
        assert!(!set.contains("/api/user/login"));
        assert!(!set.contains("/api/User"));
    }

    #[test]
    fn empty_set_exempts_nothing() {
        let set = ExemptPathSet::empty();
        assert!(set.is_empty());
        assert!(!set.contains("/api/User/Login"));
        assert!(!set.contains(""));
    }

    #[test]
    fn bootstrap_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path().join("store"));

        let set = load_or_initialize_exempt_paths(&paths).unwrap();
        assert_eq!(set, ExemptPathSet::defaults());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(paths.exempt_paths_file()).unwrap()).unwrap();
        assert_eq!(on_disk[0]["path"], "/api/User/Login");
        assert_eq!(on_disk[1]["path"], "/api/User/Register");
    }

    #[test]
    fn operator_edits_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path());
        fs::write(
            paths.exempt_paths_file(),
            r#"[{"path": "/health"}, {"path": "/api/User/Login"}]"#,
        )
        .unwrap();

        let set = load_or_initialize_exempt_paths(&paths).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("/health"));
        assert!(!set.contains("/api/User/Register"));
    }

    #[test]
    fn corrupt_registry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path());
        fs::write(paths.exempt_paths_file(), "<List/>").unwrap();

        let result = load_or_initialize_exempt_paths(&paths);
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }
}
