// Vessel track domain models

/// One historical vessel position, in map order (lon, lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub lon: f64,
    pub lat: f64,
}

impl TrackPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Raw position as returned by the positions-by-range API, before ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFeature {
    pub point: TrackPoint,
    pub timestamp_ms: Option<i64>,
}

/// Handles into the rendering collaborator owned by one displayed track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLayerIds {
    pub source_id: String,
    pub line_layer_id: String,
    pub point_layer_id: String,
}

impl TrackLayerIds {
    pub fn for_vessel(mmsi: &str) -> Self {
        Self {
            source_id: format!("track-{}", mmsi),
            line_layer_id: format!("track-{}-line", mmsi),
            point_layer_id: format!("track-{}-points", mmsi),
        }
    }
}

/// A track currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub mmsi: String,
    pub layers: TrackLayerIds,
    pub positions: Vec<TrackPoint>,
    pub color: String,
}

/// Externally observable state of a vessel's track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Absent,
    Pending,
    Visible,
}
