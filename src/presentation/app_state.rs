// Application state for HTTP handlers
use crate::application::buoy_service::BuoyService;
use crate::application::track_registry::TrackRegistry;
use crate::infrastructure::config::Bounds;
use crate::infrastructure::memory_overlay::InMemoryOverlay;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub track_registry: Arc<TrackRegistry>,
    pub overlay: Arc<InMemoryOverlay>,
    pub buoy_service: Arc<BuoyService>,
    pub default_color: String,
    pub map_bounds: Bounds,
}
