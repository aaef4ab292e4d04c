// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer Gate - Request Authentication Gate
//!
//! Issues HS256 bearer tokens bound to an email principal and decides, for
//! every inbound request, whether it may proceed. The signing secret and the
//! list of paths exempt from authentication are persisted on disk and loaded
//! once per process.
//!
//! ## Modules
//!
//! - `auth` - Token engine, per-request gate, Axum middleware
//! - `storage` - Secret store and exemption registry
//! - `api` - Demo HTTP API behind the gate (Axum)
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
