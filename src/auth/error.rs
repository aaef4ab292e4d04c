// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token errors.

/// Why a token could not be issued or accepted.
///
/// The HTTP boundary collapses every variant into the same 401 response;
/// the distinction exists for callers and logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a well-formed compact token, or signed with another algorithm
    #[error("Token is malformed")]
    Malformed,
    /// Signature does not match the active secret
    #[error("Token signature is invalid")]
    SignatureInvalid,
    /// `exp` is not strictly in the future
    #[error("Token has expired")]
    Expired,
    /// A required claim is absent
    #[error("Token is missing the '{0}' claim")]
    ClaimMissing(&'static str),
    /// Encoding the token failed
    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed_token",
            TokenError::SignatureInvalid => "invalid_signature",
            TokenError::Expired => "token_expired",
            TokenError::ClaimMissing(_) => "claim_missing",
            TokenError::Signing(_) => "signing_failed",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => {
                TokenError::ClaimMissing("exp")
            }
            _ => TokenError::Malformed,
        }
    }
}
