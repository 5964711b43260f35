use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationItem, RecommendationRequest},
    services::{
        generator::RecommendationGenerator,
        location::LocationResolver,
        movies::{MovieEnricher, MovieIdentityResolver},
        prompt::build_prompt,
        weather::WeatherResolver,
    },
};

/// `" (1999)"` at the end of a title
static RELEASE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\(\d{4}\)$").expect("valid regex"));

/// Generates personalized movie recommendations
///
/// Location and weather feed the prompt; a missing value for either aborts the request.
/// The generated titles are then resolved to catalog entries concurrently, and a
/// title that cannot be resolved is still returned, just without catalog data.
#[derive(Clone)]
pub struct RecommendationService {
    location: LocationResolver,
    weather: WeatherResolver,
    generator: RecommendationGenerator,
    identity: MovieIdentityResolver,
    enricher: MovieEnricher,
}

impl RecommendationService {
    pub fn new(
        location: LocationResolver,
        weather: WeatherResolver,
        generator: RecommendationGenerator,
        identity: MovieIdentityResolver,
        enricher: MovieEnricher,
    ) -> Self {
        Self {
            location,
            weather,
            generator,
            identity,
            enricher,
        }
    }

    pub async fn get_recommendations(
        &self,
        request: RecommendationRequest,
    ) -> AppResult<Vec<RecommendationItem>> {
        request
            .validate_coordinates()
            .map_err(AppError::InvalidInput)?;

        let (latitude, longitude) = (request.latitude, request.longitude);

        let location = self
            .location
            .resolve(latitude, longitude)
            .await
            .ok_or(AppError::LocationUnavailable {
                latitude,
                longitude,
            })?;

        let weather = self
            .weather
            .resolve(latitude, longitude)
            .await
            .ok_or(AppError::WeatherUnavailable {
                latitude,
                longitude,
            })?;

        tracing::info!(
            day_of_week = %request.day_of_week,
            month = %request.month,
            current_time = %request.current_time,
            city = ?location.city,
            state = ?location.state,
            weather = %weather,
            genres = ?request.genres,
            mood = ?request.mood,
            gender = ?request.gender,
            age = ?request.age,
            language = %request.language,
            seen = request.seen_movies.len(),
            liked = request.liked_movies.len(),
            disliked = request.disliked_movies.len(),
            "Recommendation context resolved"
        );

        let prompt = build_prompt(&request, Some(&location), Some(&weather));
        tracing::debug!(prompt = %prompt, "Recommendation prompt built");

        let titles = self
            .generator
            .generate(prompt)
            .await
            .map_err(|e| e.context("Error fetching recommendations"))?;

        Ok(self.resolve_titles(titles).await)
    }

    /// Resolves every title concurrently; output order follows input order
    pub async fn resolve_titles(&self, titles: Vec<String>) -> Vec<RecommendationItem> {
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let service = self.clone();
            let fallback = title.clone();
            let task = tokio::spawn(async move { service.resolve_title(title).await });
            tasks.push((fallback, task));
        }

        let mut items = Vec::with_capacity(tasks.len());
        for (title, task) in tasks {
            match task.await {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::error!(error = %e, title = %title, "Title resolution task failed");
                    items.push(RecommendationItem::unresolved(title));
                }
            }
        }

        let unresolved = items.iter().filter(|i| i.tmdb_id.is_none()).count();
        tracing::info!(
            total = items.len(),
            unresolved,
            "Recommendations resolved"
        );

        items
    }

    async fn resolve_title(&self, title: String) -> RecommendationItem {
        let lookup = strip_release_year(&title);

        let Some(tmdb_id) = self.identity.resolve(lookup).await else {
            return RecommendationItem::unresolved(title);
        };

        match self.enricher.resolve(tmdb_id).await {
            Some(movie) => RecommendationItem::from_record(title, &movie),
            None => RecommendationItem {
                title,
                tmdb_id: Some(tmdb_id),
                details: None,
            },
        }
    }
}

/// Drops a trailing `" (YYYY)"` so the catalog search sees the bare title
pub fn strip_release_year(title: &str) -> &str {
    match RELEASE_YEAR.find(title) {
        Some(m) => &title[..m.start()],
        None => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::models::{CatalogId, CatalogSearchResult, CurrentWeather, LocationInfo, MovieRecord};
    use crate::services::providers::{
        CatalogProvider, MockCatalogProvider, MockCompletionProvider, MockGeocodingProvider,
        MockStreamingProvider, MockWeatherProvider,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const LOOKUP_LATENCY: Duration = Duration::from_secs(2);

    /// Catalog whose every call takes `LOOKUP_LATENCY` on the tokio clock
    struct SlowCatalog;

    #[async_trait::async_trait]
    impl CatalogProvider for SlowCatalog {
        async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchResult>> {
            tokio::time::sleep(LOOKUP_LATENCY).await;
            let id = query.len() as u64;
            Ok(vec![serde_json::from_value(json!({ "id": id })).unwrap()])
        }

        async fn movie_details(&self, id: CatalogId) -> AppResult<Option<MovieRecord>> {
            tokio::time::sleep(LOOKUP_LATENCY).await;
            Ok(Some(serde_json::from_value(json!({ "id": id.0 })).unwrap()))
        }
    }

    fn request() -> RecommendationRequest {
        serde_json::from_value(json!({
            "currentTime": "9:00 PM",
            "month": "December",
            "dayOfWeek": "Saturday",
            "latitude": 41.8781,
            "longitude": -87.6298,
            "age": 30,
            "language": "English"
        }))
        .unwrap()
    }

    fn geocoding_ok() -> MockGeocodingProvider {
        let mut geocoding = MockGeocodingProvider::new();
        geocoding.expect_reverse_geocode().returning(|_, _| {
            Ok(LocationInfo {
                city: Some("Chicago".to_string()),
                state: Some("Illinois".to_string()),
            })
        });
        geocoding
    }

    fn weather_ok() -> MockWeatherProvider {
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_weather().returning(|_, _| {
            Ok(serde_json::from_value::<CurrentWeather>(json!({
                "weather": [{ "description": "overcast clouds" }],
                "main": { "temp": 31.5 }
            }))
            .unwrap())
        });
        weather
    }

    /// Catalog where every title resolves except those listed in `missing`
    fn catalog_with_missing(missing: &'static [&'static str]) -> MockCatalogProvider {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_movies().returning(move |query| {
            let query = query.to_string();
            if missing.contains(&query.as_str()) {
                return Ok(vec![]);
            }
            let id = query.len() as u64 * 100;
            Ok(vec![serde_json::from_value::<CatalogSearchResult>(json!({ "id": id }))
                .unwrap()])
        });
        catalog.expect_movie_details().returning(|id| {
            Ok(Some(
                serde_json::from_value::<MovieRecord>(json!({
                    "id": id.0,
                    "poster_path": format!("/{}.jpg", id.0),
                    "backdrop_path": format!("/{}-b.jpg", id.0)
                }))
                .unwrap(),
            ))
        });
        catalog
    }

    fn streaming_down() -> MockStreamingProvider {
        let mut streaming = MockStreamingProvider::new();
        streaming
            .expect_fetch_show()
            .returning(|_| Err(AppError::ExternalApi("503".to_string())));
        streaming
    }

    fn service(
        geocoding: MockGeocodingProvider,
        weather: MockWeatherProvider,
        completion: MockCompletionProvider,
        catalog: MockCatalogProvider,
        streaming: MockStreamingProvider,
    ) -> RecommendationService {
        let cache = Cache::default();
        let catalog: Arc<MockCatalogProvider> = Arc::new(catalog);
        RecommendationService::new(
            LocationResolver::new(Arc::new(geocoding), cache.clone()),
            WeatherResolver::new(Arc::new(weather)),
            RecommendationGenerator::new(Arc::new(completion)),
            MovieIdentityResolver::new(catalog.clone(), cache.clone()),
            MovieEnricher::new(catalog, Arc::new(streaming), cache),
        )
    }

    #[test]
    fn test_strip_release_year() {
        assert_eq!(strip_release_year("Up (2009)"), "Up");
        assert_eq!(strip_release_year("Blade Runner 2049"), "Blade Runner 2049");
        assert_eq!(strip_release_year("Ocean's (Eleven)"), "Ocean's (Eleven)");
        assert_eq!(strip_release_year("Heat(1995)"), "Heat(1995)");
    }

    #[tokio::test]
    async fn test_location_failure_aborts_before_generation() {
        let mut geocoding = MockGeocodingProvider::new();
        geocoding
            .expect_reverse_geocode()
            .returning(|_, _| Err(AppError::ExternalApi("timeout".to_string())));
        let mut weather = MockWeatherProvider::new();
        weather.expect_current_weather().times(0);
        let mut completion = MockCompletionProvider::new();
        completion.expect_chat().times(0);

        let service = service(
            geocoding,
            weather,
            completion,
            MockCatalogProvider::new(),
            MockStreamingProvider::new(),
        );

        let result = service.get_recommendations(request()).await;
        assert!(matches!(result, Err(AppError::LocationUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_weather_failure_aborts_before_generation() {
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_current_weather()
            .returning(|_, _| Err(AppError::ExternalApi("401".to_string())));
        let mut completion = MockCompletionProvider::new();
        completion.expect_chat().times(0);

        let service = service(
            geocoding_ok(),
            weather,
            completion,
            MockCatalogProvider::new(),
            MockStreamingProvider::new(),
        );

        let result = service.get_recommendations(request()).await;
        assert!(matches!(result, Err(AppError::WeatherUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected() {
        let mut geocoding = MockGeocodingProvider::new();
        geocoding.expect_reverse_geocode().times(0);

        let service = service(
            geocoding,
            MockWeatherProvider::new(),
            MockCompletionProvider::new(),
            MockCatalogProvider::new(),
            MockStreamingProvider::new(),
        );

        let mut req = request();
        req.latitude = 123.0;
        let result = service.get_recommendations(req).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_generator_failure_is_fatal() {
        let mut completion = MockCompletionProvider::new();
        completion
            .expect_chat()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("OpenAI API returned status 500".to_string())));

        let service = service(
            geocoding_ok(),
            weather_ok(),
            completion,
            MockCatalogProvider::new(),
            MockStreamingProvider::new(),
        );

        match service.get_recommendations(request()).await {
            Err(AppError::Failed { error, details }) => {
                assert_eq!(error, "Error fetching recommendations");
                assert!(details.contains("500"));
            }
            other => panic!("expected fatal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_carries_location_and_weather() {
        let mut completion = MockCompletionProvider::new();
        completion
            .expect_chat()
            .withf(|request| {
                request.user.contains("Location: Chicago, Illinois\n")
                    && request.user.contains("Weather: overcast clouds, 31.5°F\n")
            })
            .times(1)
            .returning(|_| Ok("1. Fargo".to_string()));

        let service = service(
            geocoding_ok(),
            weather_ok(),
            completion,
            catalog_with_missing(&[]),
            streaming_down(),
        );

        let items = service.get_recommendations(request()).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_resolution_keeps_order_and_length() {
        let mut completion = MockCompletionProvider::new();
        completion.expect_chat().returning(|_| {
            Ok("1. Heat (1995)\n2. Zzyzx Road\n3. Up\n4. Qwxpt\n5. Arrival".to_string())
        });

        let service = service(
            geocoding_ok(),
            weather_ok(),
            completion,
            catalog_with_missing(&["Zzyzx Road", "Qwxpt"]),
            streaming_down(),
        );

        let items = service.get_recommendations(request()).await.unwrap();

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Heat (1995)", "Zzyzx Road", "Up", "Qwxpt", "Arrival"]
        );
        assert_eq!(items.iter().filter(|i| i.tmdb_id.is_none()).count(), 2);
        assert_eq!(items[1].tmdb_id, None);
        assert_eq!(items[3].tmdb_id, None);

        // "Heat (1995)" is looked up as "Heat".
        assert_eq!(items[0].tmdb_id, Some(CatalogId(400)));

        let unresolved = serde_json::to_value(&items[1]).unwrap();
        assert_eq!(unresolved, json!({ "title": "Zzyzx Road", "tmdbId": null }));

        let resolved = serde_json::to_value(&items[2]).unwrap();
        assert_eq!(resolved["posterPath"], "/200.jpg");
        assert_eq!(resolved["backdrop_path"], "/200-b.jpg");
        assert!(resolved.get("streamingProviders").is_none());
    }

    #[tokio::test]
    async fn test_enrichment_failure_keeps_id() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_movies().returning(|_| {
            Ok(vec![serde_json::from_value::<CatalogSearchResult>(json!({ "id": 7 })).unwrap()])
        });
        catalog
            .expect_movie_details()
            .returning(|_| Err(AppError::ExternalApi("500".to_string())));

        let service = service(
            MockGeocodingProvider::new(),
            MockWeatherProvider::new(),
            MockCompletionProvider::new(),
            catalog,
            MockStreamingProvider::new(),
        );

        let items = service.resolve_titles(vec!["Se7en".to_string()]).await;
        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json, json!({ "title": "Se7en", "tmdbId": 7 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_titles_resolve_concurrently() {
        let cache = Cache::default();
        let catalog = Arc::new(SlowCatalog);
        let service = RecommendationService::new(
            LocationResolver::new(Arc::new(MockGeocodingProvider::new()), cache.clone()),
            WeatherResolver::new(Arc::new(MockWeatherProvider::new())),
            RecommendationGenerator::new(Arc::new(MockCompletionProvider::new())),
            MovieIdentityResolver::new(catalog.clone(), cache.clone()),
            MovieEnricher::new(catalog, Arc::new(streaming_down()), cache),
        );
        let titles: Vec<String> = ["A", "Bb", "Ccc", "Dddd", "Eeeee"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let started = tokio::time::Instant::now();
        let items = service.resolve_titles(titles).await;
        let elapsed = started.elapsed();

        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.tmdb_id.is_some()));
        // One search plus one detail call per title; run one after another this would
        // take ten times as long.
        assert!(elapsed >= LOOKUP_LATENCY * 2);
        assert!(elapsed < LOOKUP_LATENCY * 3, "took {:?}", elapsed);
    }
}
