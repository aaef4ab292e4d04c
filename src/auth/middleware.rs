// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Translates an axum request into a [`GateRequest`] and enforces the
//! [`Verdict`]:
//!
//! - `Forward` → the principal (if any) is inserted into request extensions
//!   and the request continues.
//! - `Unauthorized` → `401` with the body `Invalid Access`, whatever the cause.
//! - `InsecureTransport` → handled per [`InsecureTransportPolicy`].
//!
//! ```rust,ignore
//! let gate = HttpGate::new(Arc::new(AuthGate::load(&paths)?));
//!
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(gate, gate_middleware))
//!     .layer(Extension(TransportSecurity::Encrypted));
//! ```

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::gate::{AuthGate, Denial, GateRequest, Verdict};

/// Body of every credential rejection.
pub const INVALID_ACCESS: &str = "Invalid Access";

/// Body of a transport rejection under [`InsecureTransportPolicy::Reject`].
pub const HTTPS_REQUIRED: &str = "HTTPS Required";

/// Header set by TLS-terminating proxies.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// How the request reached the server. Installed as a request extension by
/// the host; a request without it is treated as plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSecurity {
    Encrypted,
    Plaintext,
}

/// Response to a request that did not arrive over an encrypted transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsecureTransportPolicy {
    /// `403` with an explanatory body.
    #[default]
    Reject,
    /// `403` with no body and `Connection: close`.
    Drop,
}

impl FromStr for InsecureTransportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "drop" => Ok(Self::Drop),
            other => Err(format!("unknown insecure transport policy '{other}'")),
        }
    }
}

/// Middleware state: the shared gate plus transport handling options.
#[derive(Debug, Clone)]
pub struct HttpGate {
    pub gate: Arc<AuthGate>,
    pub insecure_policy: InsecureTransportPolicy,
    /// Honour `X-Forwarded-Proto: https` from a trusted proxy
    pub trust_forwarded_proto: bool,
}

impl HttpGate {
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self {
            gate,
            insecure_policy: InsecureTransportPolicy::default(),
            trust_forwarded_proto: false,
        }
    }

    pub fn with_insecure_policy(mut self, policy: InsecureTransportPolicy) -> Self {
        self.insecure_policy = policy;
        self
    }

    pub fn with_trusted_forwarded_proto(mut self, trust: bool) -> Self {
        self.trust_forwarded_proto = trust;
        self
    }

    fn is_secure(&self, request: &Request) -> bool {
        if request.extensions().get::<TransportSecurity>() == Some(&TransportSecurity::Encrypted) {
            return true;
        }
        self.trust_forwarded_proto && forwarded_https(request.headers())
    }

    fn insecure_response(&self) -> Response {
        match self.insecure_policy {
            InsecureTransportPolicy::Reject => (StatusCode::FORBIDDEN, HTTPS_REQUIRED).into_response(),
            InsecureTransportPolicy::Drop => {
                let mut response = StatusCode::FORBIDDEN.into_response();
                response
                    .headers_mut()
                    .insert(CONNECTION, HeaderValue::from_static("close"));
                response
            }
        }
    }
}

fn forwarded_https(headers: &HeaderMap) -> bool {
    headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

/// The `401 Invalid Access` response.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        INVALID_ACCESS,
    )
        .into_response()
}

/// Authentication middleware function.
pub async fn gate_middleware(
    State(http): State<HttpGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let secure = http.is_secure(&request);
    let verdict = {
        let gate_request = GateRequest {
            secure,
            path: request.uri().path(),
            authorization: request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        };
        http.gate.decide(&gate_request)
    };

    match verdict {
        Verdict::Forward(principal) => {
            if let Some(principal) = principal {
                request.extensions_mut().insert(principal);
            }
            next.run(request).await
        }
        Verdict::Unauthorized(denial) => {
            match &denial {
                Denial::MissingCredential => {
                    tracing::debug!(path = %request.uri().path(), "Missing credential")
                }
                Denial::Invalid(e) => tracing::debug!(
                    path = %request.uri().path(),
                    error_code = e.error_code(),
                    "Rejected credential"
                ),
            }
            unauthorized()
        }
        Verdict::InsecureTransport => {
            tracing::debug!(path = %request.uri().path(), "Refused plaintext request");
            http.insecure_response()
        }
    }
}
