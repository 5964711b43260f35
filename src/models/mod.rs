use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt::Display};

/// Identifier of a movie in the TMDB catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub u64);

impl Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// Body of `POST /recommendations`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub current_time: String,
    pub month: String,
    pub day_of_week: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seen_movies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked_movies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disliked_movies: Vec<String>,
}

fn default_language() -> String {
    "English".to_string()
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|language| language.unwrap_or_else(default_language))
}

impl RecommendationRequest {
    /// Checks that the coordinates are finite and within range
    pub fn validate_coordinates(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} is not a valid coordinate", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "longitude {} is not a valid coordinate",
                self.longitude
            ));
        }
        Ok(())
    }
}

/// City and state for a coordinate pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Current conditions rendered for display, e.g. `"light rain, 54.3°F"`
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherInfo(String);

impl WeatherInfo {
    pub fn new(description: &str, temperature_f: f64) -> Self {
        Self(format!("{}, {}°F", description, temperature_f))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WeatherInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the `/recommendations` response
///
/// Unresolved titles serialize as `{"title": .., "tmdbId": null}` only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub title: String,
    #[serde(rename = "tmdbId")]
    pub tmdb_id: Option<CatalogId>,
    #[serde(flatten)]
    pub details: Option<RecommendationDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationDetails {
    pub backdrop_path: Option<String>,
    #[serde(rename = "posterPath")]
    pub poster_path: Option<String>,
    #[serde(rename = "streamingProviders", skip_serializing_if = "Option::is_none")]
    pub streaming_providers: Option<StreamingProviders>,
}

impl RecommendationItem {
    pub fn unresolved(title: String) -> Self {
        Self {
            title,
            tmdb_id: None,
            details: None,
        }
    }

    pub fn from_record(title: String, record: &MovieRecord) -> Self {
        Self {
            title,
            tmdb_id: Some(record.id),
            details: Some(RecommendationDetails {
                backdrop_path: record.backdrop_path.clone(),
                poster_path: record.poster_path.clone(),
                streaming_providers: record.streaming_providers.clone(),
            }),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// A hit from `GET /search/movie`; fields we don't inspect pass through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchResult {
    pub id: CatalogId,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogSearchResult {
    /// Whether the hit is suitable to show: not adult-flagged and has a poster
    pub fn is_displayable(&self) -> bool {
        !self.adult && self.poster_path.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSearchResponse {
    #[serde(default)]
    pub results: Vec<CatalogSearchResult>,
}

/// Full movie detail document, optionally enriched with streaming data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: CatalogId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_dates: ReleaseDates,
    #[serde(
        rename = "streamingProviders",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub streaming_providers: Option<StreamingProviders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieRecord {
    /// Keeps only the certification entries for one jurisdiction (ISO 3166-1 code)
    pub fn retain_certifications(&mut self, country: &str) {
        self.release_dates
            .results
            .retain(|entry| entry.iso_3166_1 == country);
    }

    /// Attaches streaming availability, cast and directors
    pub fn enrich(&mut self, show: StreamingShow) {
        self.streaming_providers = Some(show.streaming_options);
        self.cast = Some(show.cast);
        self.directors = Some(show.directors);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<CertificationEntry>,
}

/// Release dates and certifications for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<Value>,
}

// ============================================================================
// Streaming Availability API Types
// ============================================================================

/// Streaming options keyed by lowercase country code
pub type StreamingProviders = BTreeMap<String, Vec<StreamingOption>>;

/// API response from GET /shows/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingShow {
    #[serde(default)]
    pub streaming_options: StreamingProviders,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingOption {
    pub service: StreamingServiceInfo,
    /// subscription, rent, buy, free or addon
    #[serde(rename = "type")]
    pub availability_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingServiceInfo {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Geocoding / Weather API Types
// ============================================================================

/// Reverse geocoding response (geocode.maps.co)
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodeResponse {
    pub address: GeoAddress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
}

impl From<GeoAddress> for LocationInfo {
    fn from(address: GeoAddress) -> Self {
        LocationInfo {
            city: address.city.or(address.town).or(address.village),
            state: address.state,
        }
    }
}

/// Current weather response (OpenWeather, imperial units)
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: WeatherMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
}

impl CurrentWeather {
    /// Formats the first reported condition; `None` when no condition is reported
    pub fn to_weather_info(&self) -> Option<WeatherInfo> {
        self.weather
            .first()
            .map(|condition| WeatherInfo::new(&condition.description, self.main.temp))
    }
}
