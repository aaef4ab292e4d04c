// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HS256 bearer tokens bound to an email principal, and the gate that checks
//! them on every request.
//!
//! ## Auth Flow
//!
//! 1. The host issues a token with [`TokenEngine::generate`] after its own
//!    login step (the login and registration paths are exempt by default)
//! 2. Clients send `Authorization: <token>` or `Authorization: Bearer <token>`
//! 3. [`AuthGate::decide`]:
//!    - refuses anything not received over TLS
//!    - forwards exempt paths unconditionally
//!    - verifies signature and expiry, with no clock skew tolerance
//! 4. Clients call refresh before the three-day lifetime runs out
//!
//! ## Security
//!
//! - The verification algorithm is fixed; the token header cannot select it
//! - Every credential failure yields the same `401 Invalid Access`
//! - The secret and exempt paths are loaded once; edits need a restart

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod middleware;
pub mod token;

pub use claims::{Claims, Principal};
pub use error::TokenError;
pub use extractor::Auth;
pub use gate::{AuthGate, Denial, GateRequest, Verdict};
pub use middleware::{gate_middleware, HttpGate, InsecureTransportPolicy, TransportSecurity};
pub use token::{TokenEngine, TOKEN_LIFETIME_DAYS};
