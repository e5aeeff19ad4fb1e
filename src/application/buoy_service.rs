// Buoy service - Periodic wave observation polling with last-good snapshot
use crate::application::observation_repository::WaveObservationSource;
use crate::domain::buoy::StationRecord;
use crate::domain::error::FetchError;
use crate::infrastructure::multipoint_coverage::decode_multipoint;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, PoisonError, RwLock};

const MIN_POLL_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);

pub struct BuoyService {
    source: Arc<dyn WaveObservationSource>,
    window_hours: i64,
    snapshot: RwLock<Arc<Vec<StationRecord>>>,
}

impl BuoyService {
    pub fn new(source: Arc<dyn WaveObservationSource>, window_hours: i64) -> Self {
        Self {
            source,
            window_hours,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Records of the last successful poll.
    pub fn snapshot(&self) -> Arc<Vec<StationRecord>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn poll(&self) -> Vec<StationRecord> {
        self.poll_at(Utc::now()).await
    }

    /// Fetch and decode one window. A failed or empty poll returns nothing and
    /// leaves the previous snapshot in place.
    pub async fn poll_at(&self, now: DateTime<Utc>) -> Vec<StationRecord> {
        match self.fetch(now).await {
            Ok(records) => {
                tracing::info!("Buoy snapshot updated with {} stations", records.len());
                *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
                    Arc::new(records.clone());
                records
            }
            Err(e) => {
                tracing::warn!("Buoy poll failed, keeping previous snapshot: {}", e);
                Vec::new()
            }
        }
    }

    /// Poll immediately and then once per `period` (at least a second), forever.
    pub async fn run(self: Arc<Self>, period: std::time::Duration) {
        let period = period.max(MIN_POLL_PERIOD);
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            self.poll().await;
        }
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<StationRecord>, FetchError> {
        let start = now - Duration::hours(self.window_hours);
        let xml = self.source.fetch_multipoint(start, now).await?;

        let records =
            decode_multipoint(&xml).map_err(|e| FetchError::ParseFailure(e.to_string()))?;
        // Stations listed without a single measurement count as no data
        if records.iter().all(|r| r.observations.is_empty()) {
            return Err(FetchError::EmptyResult);
        }
        Ok(records)
    }
}
