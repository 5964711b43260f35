/// Upstream API providers
///
/// Each third-party API sits behind an async trait so the resolvers can be driven by
/// mocks in tests and by the reqwest-backed clients in this module at runtime. Providers
/// only translate HTTP into typed results; caching and fallback policy live in the
/// resolvers that own them.
use std::time::Duration;

use reqwest::{Client as HttpClient, Response};

use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogId, CatalogSearchResult, CurrentWeather, LocationInfo, MovieRecord, StreamingShow,
    },
};

pub mod geocode;
pub mod openai;
pub mod openweather;
pub mod streaming_availability;
pub mod tmdb;

pub use geocode::GeocodeMapsProvider;
pub use openai::OpenAiProvider;
pub use openweather::OpenWeatherProvider;
pub use streaming_availability::StreamingAvailabilityProvider;
pub use tmdb::TmdbProvider;

/// Reverse geocoding: coordinates to a place
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> AppResult<LocationInfo>;
}

/// Current weather conditions at a coordinate pair
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> AppResult<CurrentWeather>;
}

/// Movie catalog (search and detail)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Free-text movie search, adult titles excluded, in upstream ranking order
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchResult>>;

    /// Movie detail with release certifications appended
    ///
    /// `Ok(None)` means the catalog has no movie with this id.
    async fn movie_details(&self, id: CatalogId) -> AppResult<Option<MovieRecord>>;
}

/// Streaming availability, cast and crew for a catalog movie
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StreamingProvider: Send + Sync {
    async fn fetch_show(&self, id: CatalogId) -> AppResult<StreamingShow>;
}

/// A chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A plain text completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Generative text completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the content of the first choice's message
    async fn chat(&self, request: ChatRequest) -> AppResult<String>;

    /// Returns the text of the first choice
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

/// Builds the HTTP client shared by a provider's calls
pub(crate) fn build_http_client(timeout: Duration) -> AppResult<HttpClient> {
    Ok(HttpClient::builder().timeout(timeout).build()?)
}

/// Turns a non-2xx response into [`AppError::ExternalApi`] with the upstream body
pub(crate) async fn ensure_success(api: &str, response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(api, status = %status, body = %body, "External API request failed");

    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        api, status, body
    )))
}
