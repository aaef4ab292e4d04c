// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{auth::gate_middleware, state::AppState};

pub mod health;
pub mod users;

/// Build the HTTP application.
///
/// Every path, routed or not, passes through the authentication gate first,
/// so an unauthenticated request for an unknown path is answered `401`, not
/// `404`. `/health` and the OpenAPI document are no exception: operators who
/// want them open list them in the exemption registry.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi))
        .route("/api/User/Me", get(users::get_current_user))
        .route("/api/User/Refresh", post(users::refresh_token))
        .with_state(state.clone())
        .layer(from_fn_with_state(state.http_gate.clone(), gate_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, users::get_current_user, users::refresh_token),
    components(schemas(health::HealthResponse, users::UserMeResponse, users::TokenResponse)),
    modifiers(&BearerScheme),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "User", description = "Token identity and refresh")
    )
)]
struct ApiDoc;

/// The token travels in the raw `Authorization` header.
struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}
