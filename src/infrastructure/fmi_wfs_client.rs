// FMI open data WFS client for wave buoy observations
use crate::application::observation_repository::WaveObservationSource;
use crate::domain::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone)]
pub struct FmiWfsClient {
    client: reqwest::Client,
    base_url: String,
    stored_query: String,
}

impl FmiWfsClient {
    pub fn new(client: reqwest::Client, base_url: String, stored_query: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            stored_query,
        }
    }

    fn build_url(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}?service=WFS&version=2.0.0&request=GetFeature&storedquery_id={}&starttime={}&endtime={}",
            self.base_url,
            urlencoding::encode(&self.stored_query),
            urlencoding::encode(&start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            urlencoding::encode(&end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        )
    }
}

const MAX_ERROR_BODY_CHARS: usize = 200;

fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("WFS request failed with status {}: {}", status, excerpt)
}

#[async_trait]
impl WaveObservationSource for FmiWfsClient {
    async fn fetch_multipoint(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, FetchError> {
        let url = self.build_url(start, end);
        tracing::debug!("Requesting wave observations: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::NetworkFailure(status_message(status, &body)));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))
    }
}
