// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names and defaults. Configuration is read once at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GATE_DATA_DIR` | Directory holding the secret and exempt paths | `gate-data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8443` |
//! | `TLS_CERT_PATH` | PEM certificate chain | Required for `serve` |
//! | `TLS_KEY_PATH` | PEM private key | Required for `serve` |
//! | `TRUST_FORWARDED_PROTO` | Honour `X-Forwarded-Proto` | `false` |
//! | `INSECURE_TRANSPORT_POLICY` | `reject` or `drop` | `reject` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::InsecureTransportPolicy;
use crate::storage::{paths::DATA_ROOT, StoragePaths};

pub const DATA_DIR_ENV: &str = "GATE_DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const TRUST_FORWARDED_PROTO_ENV: &str = "TRUST_FORWARDED_PROTO";
pub const INSECURE_TRANSPORT_POLICY_ENV: &str = "INSECURE_TRANSPORT_POLICY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for the gate and the HTTPS server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
    pub trust_forwarded_proto: bool,
    pub insecure_policy: InsecureTransportPolicy,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (useful for testing).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string());
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| invalid(PORT_ENV, &value, e))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| invalid(HOST_ENV, &host, e))?;

        let trust_forwarded_proto = match lookup(TRUST_FORWARDED_PROTO_ENV) {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| invalid(TRUST_FORWARDED_PROTO_ENV, &value, "expected true/false"))?,
            None => false,
        };

        let insecure_policy = match lookup(INSECURE_TRANSPORT_POLICY_ENV) {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid(INSECURE_TRANSPORT_POLICY_ENV, &value, e))?,
            None => InsecureTransportPolicy::default(),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => return Err(invalid(LOG_FORMAT_ENV, other, "expected json or pretty")),
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            bind_addr,
            tls_cert_path: lookup(TLS_CERT_PATH_ENV).map(PathBuf::from),
            tls_key_path: lookup(TLS_KEY_PATH_ENV).map(PathBuf::from),
            trust_forwarded_proto,
            insecure_policy,
            log_format,
        })
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.data_dir)
    }

    /// Certificate and key paths, both required to serve.
    pub fn tls_paths(&self) -> Result<(PathBuf, PathBuf), ConfigError> {
        let cert = self
            .tls_cert_path
            .clone()
            .ok_or(ConfigError::Missing(TLS_CERT_PATH_ENV))?;
        let key = self
            .tls_key_path
            .clone()
            .ok_or(ConfigError::Missing(TLS_KEY_PATH_ENV))?;
        Ok((cert, key))
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
