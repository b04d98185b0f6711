use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use sitemet_providers::{MeteosourceClient, MeteostatClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    sitemet_obs::init("sitemet-api");

    // Config
    let cfg = sitemet_config::AppConfig::load().unwrap_or_default();
    let http_bind = cfg.http_bind();

    // Upstream clients
    let historical = Arc::new(MeteostatClient::new(
        cfg.historical_base_url(),
        cfg.historical_api_key(),
        cfg.historical_api_host(),
    ));
    let current = Arc::new(MeteosourceClient::new(
        cfg.current_base_url(),
        cfg.current_api_key(),
    ));

    tracing::info!(sites = cfg.sites.len(), "site registry loaded");

    let (app, state) = sitemet_api::build_app(cfg, historical, current);

    let addr: SocketAddr = http_bind.parse().context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    sitemet_api::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
