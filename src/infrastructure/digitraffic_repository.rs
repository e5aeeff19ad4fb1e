// Digitraffic AIS positions-by-range repository
use crate::application::observation_repository::PositionRepository;
use crate::domain::error::FetchError;
use crate::domain::track::{PositionFeature, TrackPoint};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct DigitrafficRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureProperties {
    #[serde(default)]
    timestamp_external: Option<i64>,
}

impl DigitrafficRepository {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, mmsi: &str, from_ms: i64, to_ms: i64) -> String {
        format!(
            "{}?mmsi={}&from={}&to={}",
            self.base_url,
            urlencoding::encode(mmsi),
            from_ms,
            to_ms
        )
    }
}

/// Decode a GeoJSON feature collection, skipping features without a lon/lat pair.
fn parse_feature_collection(body: &str) -> Result<Vec<PositionFeature>, FetchError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| FetchError::ParseFailure(e.to_string()))?;

    Ok(collection
        .features
        .into_iter()
        .filter_map(|feature| match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Some(PositionFeature {
                point: TrackPoint::new(*lon, *lat),
                timestamp_ms: feature.properties.and_then(|p| p.timestamp_external),
            }),
            _ => None,
        })
        .collect())
}

#[async_trait]
impl PositionRepository for DigitrafficRepository {
    async fn positions_in_range(
        &self,
        mmsi: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<PositionFeature>, FetchError> {
        let url = self.build_url(mmsi, from_ms, to_ms);
        tracing::debug!("Requesting positions: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(FetchError::NetworkFailure(format!(
                "positions API responded with status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        parse_feature_collection(&body)
    }
}
