use std::sync::Arc;

use crate::{models::WeatherInfo, services::providers::WeatherProvider};

/// Fetches and formats current weather; results are not cached
#[derive(Clone)]
pub struct WeatherResolver {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherResolver {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Returns e.g. `"scattered clouds, 68.4°F"`, or `None` on any failure
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Option<WeatherInfo> {
        match self.provider.current_weather(latitude, longitude).await {
            Ok(weather) => {
                let info = weather.to_weather_info();
                if info.is_none() {
                    tracing::warn!(latitude, longitude, "Weather response had no conditions");
                }
                info
            }
            Err(e) => {
                tracing::warn!(error = %e, latitude, longitude, "Error fetching weather data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::CurrentWeather;
    use crate::services::providers::MockWeatherProvider;
    use serde_json::json;

    fn weather(description: &str, temp: f64) -> CurrentWeather {
        serde_json::from_value(json!({
            "weather": [{ "id": 500, "main": "Rain", "description": description }],
            "main": { "temp": temp, "humidity": 80 }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_formats_description_and_temperature() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_current_weather()
            .returning(|_, _| Ok(weather("light rain", 54.3)));

        let resolver = WeatherResolver::new(Arc::new(provider));
        let info = resolver.resolve(47.6, -122.3).await.unwrap();
        assert_eq!(info.as_str(), "light rain, 54.3°F");
    }

    #[tokio::test]
    async fn test_is_not_cached() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_current_weather()
            .times(2)
            .returning(|_, _| Ok(weather("clear sky", 75.0)));

        let resolver = WeatherResolver::new(Arc::new(provider));
        resolver.resolve(1.0, 1.0).await;
        resolver.resolve(1.0, 1.0).await;
    }

    #[tokio::test]
    async fn test_failure_yields_none() {
        let mut provider = MockWeatherProvider::new();
        provider
            .expect_current_weather()
            .returning(|_, _| Err(AppError::ExternalApi("401".to_string())));

        let resolver = WeatherResolver::new(Arc::new(provider));
        assert_eq!(resolver.resolve(1.0, 1.0).await, None);
    }
}
