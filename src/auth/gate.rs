// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The per-request authentication decision.
//!
//! The gate is framework-agnostic: the host describes the request with a
//! [`GateRequest`] and enforces the returned [`Verdict`]. Steps, in order:
//!
//! 1. Transport: anything not received over an encrypted transport is refused
//!    before paths or headers are looked at.
//! 2. Exemption: an exact path match forwards unconditionally.
//! 3. Credential: the `Authorization` header value, either a bare token or
//!    `Bearer <token>`.
//! 4. Verification: absent or invalid is unauthorized, valid forwards.

use std::sync::Arc;

use super::{Principal, TokenEngine, TokenError};
use crate::storage::{
    load_or_initialize_exempt_paths, load_or_initialize_secret, ExemptPathSet, StoragePaths,
    StorageResult,
};

/// What the host must do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the request through. Carries the principal when a token was checked.
    Forward(Option<Principal>),
    /// Respond 401 `Invalid Access`.
    Unauthorized(Denial),
    /// The request did not arrive over an encrypted transport.
    InsecureTransport,
}

impl Verdict {
    pub fn is_forward(&self) -> bool {
        matches!(self, Verdict::Forward(_))
    }
}

/// Why a credential was refused. Logged, never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    MissingCredential,
    Invalid(TokenError),
}

/// Request metadata the gate needs from the host.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Whether the request arrived over an encrypted transport
    pub secure: bool,
    /// Request path, without query string
    pub path: &'a str,
    /// Raw `Authorization` header value, if present and valid UTF-8
    pub authorization: Option<&'a str>,
}

/// Authentication gate. Immutable after construction; share via `Arc`.
#[derive(Debug)]
pub struct AuthGate {
    engine: Arc<TokenEngine>,
    exemptions: ExemptPathSet,
}

impl AuthGate {
    pub fn new(engine: Arc<TokenEngine>, exemptions: ExemptPathSet) -> Self {
        Self { engine, exemptions }
    }

    /// Bootstrap the gate from persisted state.
    ///
    /// A secret that cannot be loaded is fatal. An exemption registry that
    /// cannot be loaded is logged and replaced with the empty set, so every
    /// path then requires a credential.
    pub fn load(paths: &StoragePaths) -> StorageResult<Self> {
        let secret = load_or_initialize_secret(paths)?;
        let engine = Arc::new(TokenEngine::new(&secret));

        let exemptions = match load_or_initialize_exempt_paths(paths) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to load exempt paths, requiring credentials on every path"
                );
                ExemptPathSet::empty()
            }
        };

        tracing::info!(
            secret_fingerprint = engine.secret_fingerprint(),
            exempt_paths = exemptions.len(),
            "Authentication gate ready"
        );

        Ok(Self::new(engine, exemptions))
    }

    pub fn engine(&self) -> &Arc<TokenEngine> {
        &self.engine
    }

    pub fn exemptions(&self) -> &ExemptPathSet {
        &self.exemptions
    }

    /// Decide whether `request` may proceed.
    pub fn decide(&self, request: &GateRequest<'_>) -> Verdict {
        if !request.secure {
            return Verdict::InsecureTransport;
        }

        if self.exemptions.contains(request.path) {
            return Verdict::Forward(None);
        }

        let Some(token) = request.authorization.map(bearer_token) else {
            return Verdict::Unauthorized(Denial::MissingCredential);
        };

        match self
            .engine
            .validate(token)
            .and_then(Principal::from_claims)
        {
            Ok(principal) => Verdict::Forward(Some(principal)),
            Err(e) => Verdict::Unauthorized(Denial::Invalid(e)),
        }
    }
}

/// Strip an optional `Bearer ` scheme from an `Authorization` value.
pub(crate) fn bearer_token(value: &str) -> &str {
    let value = value.trim();
    match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    }
}
