// Track fetcher - Retrieves and orders a vessel's position history
use crate::application::observation_repository::PositionRepository;
use crate::domain::track::{PositionFeature, TrackPoint};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct TrackFetcher {
    repository: Arc<dyn PositionRepository>,
}

impl TrackFetcher {
    pub fn new(repository: Arc<dyn PositionRepository>) -> Self {
        Self { repository }
    }

    /// Positions of `mmsi` over the last `lookback_hours`, oldest first.
    /// Any upstream failure is logged and yields an empty track.
    pub async fn fetch_track(&self, mmsi: &str, lookback_hours: i64) -> Vec<TrackPoint> {
        self.fetch_track_at(mmsi, lookback_hours, Utc::now()).await
    }

    pub async fn fetch_track_at(
        &self,
        mmsi: &str,
        lookback_hours: i64,
        now: DateTime<Utc>,
    ) -> Vec<TrackPoint> {
        let from = now - Duration::hours(lookback_hours);
        let (from_ms, to_ms) = (from.timestamp_millis(), now.timestamp_millis());

        tracing::debug!("Fetching track for {} between {} and {}", mmsi, from_ms, to_ms);

        match self.repository.positions_in_range(mmsi, from_ms, to_ms).await {
            Ok(features) => {
                let points = order_features(features);
                tracing::debug!("Fetched {} positions for {}", points.len(), mmsi);
                points
            }
            Err(e) => {
                tracing::warn!("Track fetch for {} failed: {}", mmsi, e);
                Vec::new()
            }
        }
    }
}

/// Sort ascending by timestamp (missing counts as epoch) and keep coordinates.
fn order_features(mut features: Vec<PositionFeature>) -> Vec<TrackPoint> {
    features.sort_by_key(|f| f.timestamp_ms.unwrap_or(0));
    features.into_iter().map(|f| f.point).collect()
}
