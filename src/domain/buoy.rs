// Wave buoy domain models
use serde::Serialize;
use std::collections::BTreeMap;

/// Station location as declared in the position block of a WFS response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPosition {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Latest observed value per parameter for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    #[serde(flatten)]
    pub position: StationPosition,
    pub observations: BTreeMap<String, f64>,
}

impl StationRecord {
    pub fn new(position: StationPosition) -> Self {
        Self {
            position,
            observations: BTreeMap::new(),
        }
    }
}
