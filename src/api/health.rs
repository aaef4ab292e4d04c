// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Number of paths exempt from authentication.
    pub exempt_paths: usize,
    /// Whether the signing secret is still the first-run placeholder.
    pub default_secret: bool,
}

/// Liveness probe. Not behind the gate.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gate = state.gate();
    Json(HealthResponse {
        status: "ok".to_string(),
        exempt_paths: gate.exemptions().len(),
        default_secret: gate.engine().uses_placeholder_secret(),
    })
}
