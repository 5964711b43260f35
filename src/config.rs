use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB (movie catalog) API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Streaming Availability API key (RapidAPI)
    pub rapidapi_key: String,

    /// Streaming Availability API base URL
    #[serde(default = "default_streaming_api_url")]
    pub streaming_api_url: String,

    /// Reverse geocoding API key
    pub geo_api_key: String,

    #[serde(default = "default_geo_api_url")]
    pub geo_api_url: String,

    /// OpenWeather API key
    pub weather_api_key: String,

    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,

    /// OpenAI API key
    pub openai_api_key: String,

    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model used for recommendation chat completions
    #[serde(default = "default_openai_chat_model")]
    pub openai_chat_model: String,

    /// Model used by the `/ask` text completion proxy
    #[serde(default = "default_openai_completion_model")]
    pub openai_completion_model: String,

    /// Response cache time-to-live in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-request timeout applied to every upstream call, in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_streaming_api_url() -> String {
    "https://streaming-availability.p.rapidapi.com".to_string()
}

fn default_geo_api_url() -> String {
    "https://geocode.maps.co".to_string()
}

fn default_weather_api_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_completion_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    43_200 // 12 hours
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
