// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::buoy_service::BuoyService;
use crate::application::track_fetcher::TrackFetcher;
use crate::application::track_registry::TrackRegistry;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::digitraffic_repository::DigitrafficRepository;
use crate::infrastructure::fmi_wfs_client::FmiWfsClient;
use crate::infrastructure::memory_overlay::InMemoryOverlay;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let settings = load_settings()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    // Upstream adapters (infrastructure layer)
    let positions = Arc::new(DigitrafficRepository::new(
        http_client.clone(),
        settings.positions.base_url.clone(),
    ));
    let waves = Arc::new(FmiWfsClient::new(
        http_client,
        settings.waves.base_url.clone(),
        settings.waves.stored_query.clone(),
    ));
    let overlay = Arc::new(InMemoryOverlay::new());

    // Services (application layer)
    let track_registry = Arc::new(TrackRegistry::new(
        TrackFetcher::new(positions),
        overlay.clone(),
        settings.tracks.lookback_hours,
        settings.tracks.before_layer.clone(),
    ));
    let buoy_service = Arc::new(BuoyService::new(waves, settings.waves.window_hours));

    let poll_period = Duration::from_secs(settings.waves.poll_minutes * 60);
    tokio::spawn(buoy_service.clone().run(poll_period));

    let state = Arc::new(AppState {
        track_registry,
        overlay,
        buoy_service,
        default_color: settings.tracks.default_color.clone(),
        map_bounds: settings.map.bounds,
    });

    let router = build_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Starting baltic-overlay service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
