// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthGate, HttpGate, TokenEngine};

#[derive(Clone)]
pub struct AppState {
    pub http_gate: HttpGate,
}

impl AppState {
    pub fn new(http_gate: HttpGate) -> Self {
        Self { http_gate }
    }

    pub fn gate(&self) -> &Arc<AuthGate> {
        &self.http_gate.gate
    }

    pub fn engine(&self) -> &Arc<TokenEngine> {
        self.gate().engine()
    }
}
