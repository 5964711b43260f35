/// Streaming Availability API provider (via RapidAPI)
///
/// Looks shows up by TMDB id and returns per-country streaming options together with
/// the cast and directors the API reports.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::{CatalogId, StreamingShow},
    services::providers::{build_http_client, ensure_success, StreamingProvider},
};

const RAPIDAPI_HOST: &str = "streaming-availability.p.rapidapi.com";
const SEARCH_COUNTRY: &str = "us";
const OUTPUT_LANGUAGE: &str = "en";

#[derive(Clone)]
pub struct StreamingAvailabilityProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl StreamingAvailabilityProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            api_key,
            api_url,
        })
    }

    /// Show path for a TMDB movie; the `/` inside the id is sent percent-encoded
    fn show_url(&self, id: CatalogId) -> String {
        format!("{}/shows/movie%2f{}", self.api_url, id)
    }
}

#[async_trait::async_trait]
impl StreamingProvider for StreamingAvailabilityProvider {
    async fn fetch_show(&self, id: CatalogId) -> AppResult<StreamingShow> {
        let tmdb_id = id.to_string();
        let response = self
            .http_client
            .get(self.show_url(id))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(&[
                ("country", SEARCH_COUNTRY),
                ("tmdb_id", tmdb_id.as_str()),
                ("output_language", OUTPUT_LANGUAGE),
            ])
            .send()
            .await?;

        let response = ensure_success("Streaming Availability", response).await?;
        let show: StreamingShow = response.json().await?;

        tracing::info!(
            tmdb_id = %id,
            countries = show.streaming_options.len(),
            provider = "streaming_availability",
            "Availability fetched"
        );

        Ok(show)
    }
}
