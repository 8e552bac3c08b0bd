//! CGO HTTP service binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cgo_server::{build_router, engine_from_config, Config, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("cgo_server=info".parse()?))
        .init();

    let config = Config::parse();
    let data_dir = config.data_dir();
    info!(data_dir = %data_dir.display(), development = config.development, "starting CGO server");

    let engine = engine_from_config(&config);
    let state = Arc::new(ServerState::new(&config, engine));
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!(addr = %config.bind, "CGO server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
