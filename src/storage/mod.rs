// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persisted Gate State
//!
//! The gate keeps two pieces of state on disk, both loaded once at startup
//! and treated as immutable afterwards.
//!
//! ## Storage Layout
//!
//! ```text
//! gate-data/
//!   jwt_secret.txt      # HMAC signing secret (plain text, trimmed on read)
//!   exempt_paths.json   # [{"path": "/api/User/Login"}, ...]
//! ```
//!
//! Both files are created with defaults on first run. Changing either one
//! takes effect on the next process start.

pub mod exemptions;
pub mod fs;
pub mod paths;
pub mod secret;

pub use exemptions::{load_or_initialize_exempt_paths, ExemptPath, ExemptPathSet};
pub use fs::{StorageError, StorageResult};
pub use paths::StoragePaths;
pub use secret::{load_or_initialize_secret, Secret, PLACEHOLDER_SECRET};
