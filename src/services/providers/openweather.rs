/// Current conditions via the OpenWeather API, in imperial units
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::CurrentWeather,
    services::providers::{build_http_client, ensure_success, WeatherProvider},
};

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            api_key,
            api_url,
        })
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> AppResult<CurrentWeather> {
        let url = format!("{}/data/2.5/weather", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success("OpenWeather", response).await?;
        Ok(response.json().await?)
    }
}
