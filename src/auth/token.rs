// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token engine.
//!
//! Built once from the active [`Secret`] and shared read-only. The algorithm
//! is pinned to HS256; the `alg` field of a presented token is never used to
//! pick a verifier, so tokens claiming `none` or any other algorithm fail.
//!
//! Expiry is checked with zero leeway: a token is accepted only while its
//! `exp` is strictly greater than the current Unix time.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::RawClaims;
use super::{Claims, TokenError};
use crate::storage::Secret;

/// Fixed lifetime of every issued token.
pub const TOKEN_LIFETIME_DAYS: i64 = 3;

/// Issues and verifies tokens against a single secret.
pub struct TokenEngine {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    fingerprint: String,
    placeholder: bool,
}

impl fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEngine")
            .field("algorithm", &Algorithm::HS256)
            .field("secret_fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

impl TokenEngine {
    pub fn new(secret: &Secret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // expiry is checked in `validate_at` with a strict comparison
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            fingerprint: secret.fingerprint(),
            placeholder: secret.is_placeholder(),
        }
    }

    /// Fingerprint of the secret this engine signs with.
    pub fn secret_fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Whether tokens are signed with the first-run placeholder secret.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.placeholder
    }

    /// Issue a token for `principal` that expires in three days.
    pub fn generate(&self, principal: &str) -> Result<String, TokenError> {
        self.generate_expiring_at(principal, Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS))
    }

    /// Issue a token for `principal` with an explicit expiry.
    pub fn generate_expiring_at(
        &self,
        principal: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            email: principal.to_string(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Whether `token` is currently valid.
    pub fn verify(&self, token: &str) -> bool {
        self.validate(token).is_ok()
    }

    /// Verify `token` and return its claims, or the reason it was refused.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = Claims::try_from(data.claims)?;
        // an `exp` with no calendar representation cannot be honoured downstream
        claims.expires_at()?;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// The `email` claim of a valid token.
    pub fn extract_principal(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.validate(token)?.email)
    }

    /// The `exp` claim of a valid token as an absolute timestamp.
    pub fn extract_expiration(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        self.validate(token)?.expires_at()
    }

    /// Verify `token` and issue a new one for the same principal with a fresh
    /// lifetime. The old token stays valid until its own expiry.
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        let principal = self.extract_principal(token)?;
        self.generate(&principal)
    }
}
