// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{gate::bearer_token, Auth, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /api/User/Me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    /// Principal identifier (`email` claim)
    pub email: String,
    /// When the presented token expires
    pub expires_at: DateTime<Utc>,
}

impl From<Principal> for UserMeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            email: principal.email,
            expires_at: principal.expires_at,
        }
    }
}

/// Response for POST /api/User/Refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Newly issued token
    pub token: String,
    /// Expiration of the new token
    pub expires_at: DateTime<Utc>,
}

/// Get the identity asserted by the presented token.
#[utoipa::path(
    get,
    path = "/api/User/Me",
    tag = "User",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Principal information", body = UserMeResponse),
        (status = 401, description = "Invalid Access"),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(principal.into())
}

/// Exchange a valid token for a new one with a fresh three-day lifetime.
///
/// The presented token is not revoked and stays valid until its own expiry.
#[utoipa::path(
    post,
    path = "/api/User/Refresh",
    tag = "User",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "New token", body = TokenResponse),
        (status = 401, description = "Invalid Access"),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Auth(principal): Auth,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(bearer_token)
        .ok_or_else(ApiError::unauthorized)?;

    let engine = state.engine();
    let token = engine.refresh(presented)?;
    let expires_at = engine.extract_expiration(&token)?;

    tracing::info!(email = %principal.email, "Issued refreshed token");

    Ok(Json(TokenResponse { token, expires_at }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_me_response_from_principal() {
        let now = Utc::now();
        let principal = Principal {
            email: "user@example.com".to_string(),
            expires_at: now,
        };

        let response: UserMeResponse = principal.into();
        assert_eq!(response.email, "user@example.com");
        assert_eq!(response.expires_at, now);
    }
}
