// HTTP request handlers
use crate::domain::buoy::StationRecord;
use crate::domain::overlay::OverlayScene;
use crate::infrastructure::config::Bounds;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ColorQuery {
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackStatus {
    pub mmsi: String,
    pub visible: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisibleTracks {
    pub visible: Vec<String>,
}

#[derive(Serialize)]
pub struct MapView {
    pub bounds: Bounds,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn map_view(State(state): State<Arc<AppState>>) -> Json<MapView> {
    Json(MapView {
        bounds: state.map_bounds,
    })
}

pub async fn list_tracks(State(state): State<Arc<AppState>>) -> Json<VisibleTracks> {
    Json(VisibleTracks {
        visible: state.track_registry.visible_ids(),
    })
}

pub async fn track_status(
    Path(mmsi): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrackStatus>, StatusCode> {
    validate_mmsi(&mmsi)?;
    let visible = state.track_registry.is_visible(&mmsi);
    Ok(Json(TrackStatus { mmsi, visible }))
}

pub async fn show_track(
    Path(mmsi): Path<String>,
    Query(query): Query<ColorQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrackStatus>, StatusCode> {
    validate_mmsi(&mmsi)?;
    let color = query.color.unwrap_or_else(|| state.default_color.clone());
    let visible = state.track_registry.show(&mmsi, &color).await;
    Ok(Json(TrackStatus { mmsi, visible }))
}

pub async fn hide_track(
    Path(mmsi): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrackStatus>, StatusCode> {
    validate_mmsi(&mmsi)?;
    state.track_registry.hide(&mmsi);
    Ok(Json(TrackStatus {
        mmsi,
        visible: false,
    }))
}

/// Flip a vessel's track, reporting the visibility it ended up in
pub async fn toggle_track(
    Path(mmsi): Path<String>,
    Query(query): Query<ColorQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrackStatus>, StatusCode> {
    validate_mmsi(&mmsi)?;
    let color = query.color.unwrap_or_else(|| state.default_color.clone());
    let visible = state.track_registry.toggle(&mmsi, &color).await;
    Ok(Json(TrackStatus { mmsi, visible }))
}

pub async fn overlay_scene(State(state): State<Arc<AppState>>) -> Json<OverlayScene> {
    Json(state.overlay.scene())
}

pub async fn buoy_snapshot(State(state): State<Arc<AppState>>) -> Json<Vec<StationRecord>> {
    Json(state.buoy_service.snapshot().as_ref().clone())
}

/// MMSIs are nine digit identifiers; anything else never reaches upstream
fn validate_mmsi(mmsi: &str) -> Result<(), StatusCode> {
    if !mmsi.is_empty() && mmsi.len() <= 9 && mmsi.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}
