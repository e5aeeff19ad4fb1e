// Shared fakes for unit tests
use crate::application::observation_repository::{PositionRepository, WaveObservationSource};
use crate::application::overlay_renderer::OverlayRenderer;
use crate::domain::error::{FetchError, RenderError};
use crate::domain::overlay::LayerSpec;
use crate::domain::track::{PositionFeature, TrackPoint};
use crate::infrastructure::memory_overlay::InMemoryOverlay;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn feature(lon: f64, lat: f64, timestamp_ms: Option<i64>) -> PositionFeature {
    PositionFeature {
        point: TrackPoint::new(lon, lat),
        timestamp_ms,
    }
}

/// Serves canned tracks per MMSI and records every request.
pub struct FakePositionRepository {
    tracks: HashMap<String, Vec<PositionFeature>>,
    failure: Option<FetchError>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(String, i64, i64)>>,
}

impl FakePositionRepository {
    pub fn with_track(mmsi: &str, features: Vec<PositionFeature>) -> Self {
        Self {
            tracks: HashMap::from([(mmsi.to_string(), features)]),
            failure: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            tracks: HashMap::new(),
            failure: Some(error),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hold every fetch until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<(String, i64, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PositionRepository for FakePositionRepository {
    async fn positions_in_range(
        &self,
        mmsi: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<PositionFeature>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((mmsi.to_string(), from_ms, to_ms));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.tracks.get(mmsi).cloned().unwrap_or_default())
    }
}

/// Renderer that forwards to an in-memory scene and logs each call.
pub struct RecordingRenderer {
    inner: InMemoryOverlay,
    calls: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            inner: InMemoryOverlay::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn add_source(&self, id: &str, data: Value) -> Result<(), RenderError> {
        self.record(format!("add_source {}", id));
        self.inner.add_source(id, data)
    }

    fn add_layer(&self, layer: LayerSpec, before_id: Option<&str>) -> Result<(), RenderError> {
        self.record(format!("add_layer {}", layer.id));
        self.inner.add_layer(layer, before_id)
    }

    fn remove_layer(&self, id: &str) -> Result<(), RenderError> {
        self.record(format!("remove_layer {}", id));
        self.inner.remove_layer(id)
    }

    fn remove_source(&self, id: &str) -> Result<(), RenderError> {
        self.record(format!("remove_source {}", id));
        self.inner.remove_source(id)
    }

    fn get_layer(&self, id: &str) -> Option<LayerSpec> {
        self.record(format!("get_layer {}", id));
        self.inner.get_layer(id)
    }

    fn get_source(&self, id: &str) -> Option<Value> {
        self.record(format!("get_source {}", id));
        self.inner.get_source(id)
    }
}

/// Replays queued WFS responses in order, then fails.
pub struct FakeWaveSource {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    windows: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl FakeWaveSource {
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            windows: Mutex::new(Vec::new()),
        }
    }

    pub fn windows(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl WaveObservationSource for FakeWaveSource {
    async fn fetch_multipoint(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, FetchError> {
        self.windows.lock().unwrap().push((start, end));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::NetworkFailure("no response queued".to_string())))
    }
}

pub fn point_xml(id: &str, name: &str, pos: &str) -> String {
    format!(
        r#"<gml:Point gml:id="{id}" srsName="http://www.opengis.net/def/crs/EPSG/0/4258">
             <gml:name>{name}</gml:name>
             <gml:pos>{pos}</gml:pos>
           </gml:Point>"#
    )
}

/// Multipoint coverage document shaped like an FMI wave observation response.
pub fn multipoint_document_with(points: &[String], fields: &[&str], rows: &[&str]) -> String {
    let fields: String = fields
        .iter()
        .map(|f| format!(r#"<swe:field name="{f}" xlink:href="urn:param:{f}"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:gml="http://www.opengis.net/gml/3.2"
    xmlns:gmlcov="http://www.opengis.net/gmlcov/1.0"
    xmlns:swe="http://www.opengis.net/swe/2.0"
    xmlns:xlink="http://www.w3.org/1999/xlink">
  <wfs:member>
    <gmlcov:MultiPointCoverage>
      <gml:domainSet>
        <gmlcov:SimpleMultiPoint>
          <gmlcov:positions>60.12 24.97 1717243200</gmlcov:positions>
        </gmlcov:SimpleMultiPoint>
      </gml:domainSet>
      <gml:rangeSet>
        <gml:DataBlock>
          <gml:doubleOrNilReasonTupleList>
            {rows}
          </gml:doubleOrNilReasonTupleList>
        </gml:DataBlock>
      </gml:rangeSet>
      <gmlcov:rangeType>
        <swe:DataRecord>{fields}</swe:DataRecord>
      </gmlcov:rangeType>
    </gmlcov:MultiPointCoverage>
  </wfs:member>
  <wfs:member>
    <gml:MultiPoint>{points}</gml:MultiPoint>
  </wfs:member>
</wfs:FeatureCollection>"#,
        rows = rows.join("\n            "),
        points = points.concat(),
    )
}

pub fn multipoint_document(points: &[(&str, &str, &str)], fields: &[&str], rows: &[&str]) -> String {
    let points: Vec<String> = points
        .iter()
        .map(|(id, name, pos)| point_xml(id, name, pos))
        .collect();
    multipoint_document_with(&points, fields, rows)
}
