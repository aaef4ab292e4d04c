// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TokenError;

/// Claims written into every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Principal identifier
    pub email: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

/// Claims as read back from a verified token.
///
/// Both fields are optional here so a signed token lacking one surfaces as
/// `ClaimMissing` rather than a generic decode failure.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        Ok(Claims {
            email: raw.email.ok_or(TokenError::ClaimMissing("email"))?,
            exp: raw.exp.ok_or(TokenError::ClaimMissing("exp"))?,
        })
    }
}

impl Claims {
    /// `exp` as an absolute UTC timestamp.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenError> {
        DateTime::from_timestamp(self.exp, 0).ok_or(TokenError::Malformed)
    }
}

/// Authenticated principal, placed in request extensions by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// The `email` claim of the presented token
    pub email: String,
    /// Token expiration
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    pub fn from_claims(claims: Claims) -> Result<Self, TokenError> {
        let expires_at = claims.expires_at()?;
        Ok(Self {
            email: claims.email,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_claims_without_email_are_rejected() {
        let raw: RawClaims = serde_json::from_str(r#"{"exp": 1700000000}"#).unwrap();
        assert_eq!(
            Claims::try_from(raw).unwrap_err(),
            TokenError::ClaimMissing("email")
        );
    }

    #[test]
    fn raw_claims_without_exp_are_rejected() {
        let raw: RawClaims = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(
            Claims::try_from(raw).unwrap_err(),
            TokenError::ClaimMissing("exp")
        );
    }

    #[test]
    fn extra_claims_are_ignored() {
        let raw: RawClaims =
            serde_json::from_str(r#"{"email": "a@b.c", "exp": 1700000000, "role": "admin"}"#)
                .unwrap();
        let claims = Claims::try_from(raw).unwrap();
        assert_eq!(claims.email, "a@b.c");
    }

    #[test]
    fn principal_converts_expiry() {
        let claims = Claims {
            email: "user@example.com".to_string(),
            exp: 1_700_000_000,
        };
        let principal = Principal::from_claims(claims).unwrap();
        assert_eq!(principal.email, "user@example.com");
        assert_eq!(principal.expires_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn out_of_range_expiry_is_malformed() {
        let claims = Claims {
            email: "x".to_string(),
            exp: i64::MAX,
        };
        assert_eq!(claims.expires_at().unwrap_err(), TokenError::Malformed);
    }
}
