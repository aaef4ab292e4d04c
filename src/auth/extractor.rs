// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! Reads the [`Principal`] that [`gate_middleware`](super::gate_middleware)
//! placed in request extensions:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.email is the token's `email` claim
//! }
//! ```
//!
//! A handler behind an exempt path has no principal and rejects with `401`.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::Principal;
use crate::error::ApiError;

pub struct Auth(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or_else(ApiError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::to_bytes,
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use chrono::Utc;

    #[tokio::test]
    async fn reads_principal_from_extensions() {
        let principal = Principal {
            email: "user@example.com".to_string(),
            expires_at: Utc::now(),
        };
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(principal.clone());

        let Auth(found) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found, principal);
    }

    #[tokio::test]
    async fn missing_principal_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let rejection = Auth::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], crate::auth::middleware::INVALID_ACCESS.as_bytes());
    }
}
