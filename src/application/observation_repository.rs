// Repository traits for upstream position and wave data
use crate::domain::error::FetchError;
use crate::domain::track::PositionFeature;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Fetch every reported position of a vessel between two epoch-ms instants.
    /// Order of the returned features is whatever the upstream API produced.
    async fn positions_in_range(
        &self,
        mmsi: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<PositionFeature>, FetchError>;
}

#[async_trait]
pub trait WaveObservationSource: Send + Sync {
    /// Fetch the raw multipoint coverage document for a time window.
    async fn fetch_multipoint(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, FetchError>;
}
