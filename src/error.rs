// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::TokenError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, crate::auth::middleware::INVALID_ACCESS)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) => {
                tracing::error!(error = %e, "Token signing failed");
                Self::internal("Token could not be issued")
            }
            _ => Self::unauthorized(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // every 401 carries the gate's fixed body, whoever raised it
        if self.status == StatusCode::UNAUTHORIZED {
            return crate::auth::middleware::unauthorized();
        }

        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
