// Track registry - Per-vessel show/hide/toggle state machine for track overlays
use crate::application::overlay_renderer::OverlayRenderer;
use crate::application::track_fetcher::TrackFetcher;
use crate::domain::error::RenderError;
use crate::domain::overlay::{LayerKind, LayerSpec};
use crate::domain::track::{TrackEntry, TrackLayerIds, TrackPoint, TrackState};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Slot {
    /// Show in flight; the ticket identifies which request owns the slot.
    Pending(u64),
    Visible(TrackEntry),
}

pub struct TrackRegistry {
    fetcher: TrackFetcher,
    renderer: Arc<dyn OverlayRenderer>,
    lookback_hours: i64,
    before_layer: Option<String>,
    slots: Mutex<HashMap<String, Slot>>,
    next_ticket: AtomicU64,
}

impl TrackRegistry {
    pub fn new(
        fetcher: TrackFetcher,
        renderer: Arc<dyn OverlayRenderer>,
        lookback_hours: i64,
        before_layer: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            lookback_hours,
            before_layer,
            slots: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn state(&self, mmsi: &str) -> TrackState {
        match self.lock().get(mmsi) {
            None => TrackState::Absent,
            Some(Slot::Pending(_)) => TrackState::Pending,
            Some(Slot::Visible(_)) => TrackState::Visible,
        }
    }

    pub fn is_visible(&self, mmsi: &str) -> bool {
        self.state(mmsi) == TrackState::Visible
    }

    pub fn visible_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Visible(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn track(&self, mmsi: &str) -> Option<TrackEntry> {
        match self.lock().get(mmsi) {
            Some(Slot::Visible(entry)) => Some(entry.clone()),
            _ => None,
        }
    }

    /// Fetch and draw the track of `mmsi`. Returns whether it is visible afterwards.
    ///
    /// A no-op while the track is already visible or a show is in flight.
    pub async fn show(&self, mmsi: &str, color: &str) -> bool {
        let ticket = {
            let mut slots = self.lock();
            match slots.get(mmsi) {
                Some(Slot::Visible(_)) => return true,
                Some(Slot::Pending(_)) => {
                    tracing::debug!("Track for {} is already loading", mmsi);
                    return false;
                }
                None => {}
            }
            let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
            slots.insert(mmsi.to_string(), Slot::Pending(ticket));
            ticket
        };

        let mut guard = PendingGuard {
            registry: self,
            mmsi,
            ticket,
            armed: true,
        };
        let positions = self.fetcher.fetch_track(mmsi, self.lookback_hours).await;
        guard.armed = false;

        let mut slots = self.lock();
        if !matches!(slots.get(mmsi), Some(Slot::Pending(t)) if *t == ticket) {
            tracing::info!("Show for {} was cancelled during fetch, discarding result", mmsi);
            return matches!(slots.get(mmsi), Some(Slot::Visible(_)));
        }

        if positions.is_empty() {
            slots.remove(mmsi);
            tracing::warn!("No positions found for {} in the last {}h", mmsi, self.lookback_hours);
            return false;
        }

        let entry = TrackEntry {
            mmsi: mmsi.to_string(),
            layers: TrackLayerIds::for_vessel(mmsi),
            positions,
            color: color.to_string(),
        };

        match self.draw(&entry) {
            Ok(()) => {
                tracing::info!(
                    "Showing track for {} ({} positions)",
                    entry.mmsi,
                    entry.positions.len()
                );
                slots.insert(mmsi.to_string(), Slot::Visible(entry));
                true
            }
            Err(e) => {
                tracing::error!("Failed to draw track for {}: {}", mmsi, e);
                slots.remove(mmsi);
                false
            }
        }
    }

    /// Tear down the track of `mmsi`; cancels a show still in flight.
    pub fn hide(&self, mmsi: &str) {
        match self.lock().remove(mmsi) {
            Some(Slot::Visible(entry)) => {
                self.erase(&entry.layers);
                tracing::info!("Hid track for {}", mmsi);
            }
            Some(Slot::Pending(_)) => {
                tracing::info!("Cancelled pending track for {}", mmsi);
            }
            None => {
                tracing::debug!("Track for {} is not shown, nothing to hide", mmsi);
            }
        }
    }

    /// Hide when visible, show otherwise. Returns the resulting visibility.
    pub async fn toggle(&self, mmsi: &str, color: &str) -> bool {
        if self.is_visible(mmsi) {
            self.hide(mmsi);
            false
        } else {
            self.show(mmsi, color).await
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add source, line layer and point layer; on failure nothing stays behind.
    fn draw(&self, entry: &TrackEntry) -> Result<(), RenderError> {
        let ids = &entry.layers;
        // A missing anchor layer means the tracks go on top
        let before = self
            .before_layer
            .as_deref()
            .filter(|id| self.renderer.get_layer(id).is_some());

        self.renderer
            .add_source(&ids.source_id, track_geojson(&entry.positions))?;

        if let Err(e) = self.renderer.add_layer(line_layer(entry), before) {
            self.remove_source(&ids.source_id);
            return Err(e);
        }

        if let Err(e) = self.renderer.add_layer(point_layer(entry), before) {
            self.remove_layer(&ids.line_layer_id);
            self.remove_source(&ids.source_id);
            return Err(e);
        }

        Ok(())
    }

    /// Layers go before their source so no layer outlives what it draws from.
    fn erase(&self, ids: &TrackLayerIds) {
        self.remove_layer(&ids.point_layer_id);
        self.remove_layer(&ids.line_layer_id);
        self.remove_source(&ids.source_id);
    }

    fn remove_layer(&self, id: &str) {
        if self.renderer.get_layer(id).is_some() {
            if let Err(e) = self.renderer.remove_layer(id) {
                tracing::warn!("Failed to remove layer {}: {}", id, e);
            }
        }
    }

    fn remove_source(&self, id: &str) {
        if self.renderer.get_source(id).is_some() {
            if let Err(e) = self.renderer.remove_source(id) {
                tracing::warn!("Failed to remove source {}: {}", id, e);
            }
        }
    }
}

/// Clears a `Pending` slot if the show future is dropped mid-fetch.
struct PendingGuard<'a> {
    registry: &'a TrackRegistry,
    mmsi: &'a str,
    ticket: u64,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.registry.lock();
        if matches!(slots.get(self.mmsi), Some(Slot::Pending(t)) if *t == self.ticket) {
            slots.remove(self.mmsi);
            tracing::debug!("Show for {} dropped before completion", self.mmsi);
        }
    }
}

fn track_geojson(positions: &[TrackPoint]) -> Value {
    let coordinates: Vec<[f64; 2]> = positions.iter().map(|p| [p.lon, p.lat]).collect();

    let mut features = Vec::with_capacity(coordinates.len() + 1);
    if coordinates.len() >= 2 {
        features.push(json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "LineString", "coordinates": coordinates },
        }));
    }
    features.extend(coordinates.iter().enumerate().map(|(index, c)| {
        json!({
            "type": "Feature",
            "properties": { "index": index },
            "geometry": { "type": "Point", "coordinates": c },
        })
    }));

    json!({ "type": "FeatureCollection", "features": features })
}

fn line_layer(entry: &TrackEntry) -> LayerSpec {
    LayerSpec {
        id: entry.layers.line_layer_id.clone(),
        kind: LayerKind::Line,
        source: entry.layers.source_id.clone(),
        filter: Some(json!(["==", ["geometry-type"], "LineString"])),
        paint: json!({
            "line-color": entry.color,
            "line-width": 2,
            "line-opacity": 0.8,
        }),
    }
}

fn point_layer(entry: &TrackEntry) -> LayerSpec {
    LayerSpec {
        id: entry.layers.point_layer_id.clone(),
        kind: LayerKind::Circle,
        source: entry.layers.source_id.clone(),
        filter: Some(json!(["==", ["geometry-type"], "Point"])),
        paint: json!({
            "circle-radius": 3,
            "circle-color": entry.color,
            "circle-opacity": 0.9,
        }),
    }
}
