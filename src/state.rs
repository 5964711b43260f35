use std::sync::Arc;

use crate::{
    cache::Cache,
    config::Config,
    error::AppResult,
    services::{
        providers::{
            CatalogProvider, CompletionProvider, GeocodeMapsProvider, GeocodingProvider,
            OpenAiProvider, OpenWeatherProvider, StreamingAvailabilityProvider,
            StreamingProvider, TmdbProvider, WeatherProvider,
        },
        Assistant, LocationResolver, MovieEnricher, MovieIdentityResolver,
        RecommendationGenerator, RecommendationService, TitleSearcher, WeatherResolver,
    },
};

/// The upstream clients the services are built from
#[derive(Clone)]
pub struct Providers {
    pub geocoding: Arc<dyn GeocodingProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub streaming: Arc<dyn StreamingProvider>,
    pub completion: Arc<dyn CompletionProvider>,
}

impl Providers {
    /// Builds the HTTP-backed providers, one client each, sharing the configured timeout
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let timeout = config.upstream_timeout();

        Ok(Self {
            geocoding: Arc::new(GeocodeMapsProvider::new(
                config.geo_api_key.clone(),
                config.geo_api_url.clone(),
                timeout,
            )?),
            weather: Arc::new(OpenWeatherProvider::new(
                config.weather_api_key.clone(),
                config.weather_api_url.clone(),
                timeout,
            )?),
            catalog: Arc::new(TmdbProvider::new(
                config.tmdb_api_key.clone(),
                config.tmdb_api_url.clone(),
                timeout,
            )?),
            streaming: Arc::new(StreamingAvailabilityProvider::new(
                config.rapidapi_key.clone(),
                config.streaming_api_url.clone(),
                timeout,
            )?),
            completion: Arc::new(OpenAiProvider::new(
                config.openai_api_key.clone(),
                config.openai_api_url.clone(),
                config.openai_chat_model.clone(),
                config.openai_completion_model.clone(),
                timeout,
            )?),
        })
    }
}

/// Shared application state handed to every handler
pub struct AppState {
    pub recommendations: RecommendationService,
    pub titles: TitleSearcher,
    pub movies: MovieEnricher,
    pub assistant: Assistant,
}

impl AppState {
    /// Wires the services; every cached resolver shares `cache`
    pub fn new(providers: Providers, cache: Cache) -> Self {
        let enricher = MovieEnricher::new(
            providers.catalog.clone(),
            providers.streaming.clone(),
            cache.clone(),
        );

        let recommendations = RecommendationService::new(
            LocationResolver::new(providers.geocoding.clone(), cache.clone()),
            WeatherResolver::new(providers.weather.clone()),
            RecommendationGenerator::new(providers.completion.clone()),
            MovieIdentityResolver::new(providers.catalog.clone(), cache.clone()),
            enricher.clone(),
        );

        Self {
            recommendations,
            titles: TitleSearcher::new(providers.catalog, cache),
            movies: enricher,
            assistant: Assistant::new(providers.completion),
        }
    }
}
