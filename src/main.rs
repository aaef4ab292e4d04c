// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, sync::Arc};

use axum::Extension;
use axum_server::tls_rustls::RustlsConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bearer_gate::{
    api::router,
    auth::{AuthGate, HttpGate, TransportSecurity},
    config::{LogFormat, Settings, DEFAULT_LOG_FILTER},
    state::AppState,
};

#[derive(Parser)]
#[command(name = "bearer-gate")]
#[command(about = "HS256 bearer token gate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the gated API over HTTPS
    Serve,
    /// Issue a token for a principal and print it
    Issue {
        /// Principal identifier written to the `email` claim
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    // Secret problems abort startup; never run with an undefined secret.
    let gate = Arc::new(AuthGate::load(&settings.storage_paths())?);

    match cli.command {
        Commands::Issue { email } => {
            let token = gate.engine().generate(&email)?;
            println!("{token}");
            Ok(())
        }
        Commands::Serve => serve(settings, gate).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // stdout is reserved for command output such as issued tokens
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve(settings: Settings, gate: Arc<AuthGate>) -> Result<(), Box<dyn Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    let (cert, key) = settings.tls_paths()?;
    let tls_config = RustlsConfig::from_pem_file(&cert, &key).await?;
    tracing::info!(cert = %cert.display(), "Loaded TLS credentials");

    let http_gate = HttpGate::new(gate)
        .with_insecure_policy(settings.insecure_policy)
        .with_trusted_forwarded_proto(settings.trust_forwarded_proto);

    // Every connection accepted below is TLS.
    let app = router(AppState::new(http_gate)).layer(Extension(TransportSecurity::Encrypted));

    tracing::info!(addr = %settings.bind_addr, "Bearer gate listening on https");

    axum_server::bind_rustls(settings.bind_addr, tls_config)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
