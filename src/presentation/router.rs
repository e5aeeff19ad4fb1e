// Route table for the overlay service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    buoy_snapshot, health_check, hide_track, list_tracks, map_view, overlay_scene, show_track,
    toggle_track, track_status,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/map", get(map_view))
        .route("/tracks", get(list_tracks))
        .route(
            "/tracks/:mmsi",
            get(track_status).put(show_track).delete(hide_track),
        )
        .route("/tracks/:mmsi/toggle", post(toggle_track))
        .route("/overlay", get(overlay_scene))
        .route("/buoys", get(buoy_snapshot))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
