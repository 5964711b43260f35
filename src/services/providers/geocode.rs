/// Reverse geocoding via geocode.maps.co
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::{LocationInfo, ReverseGeocodeResponse},
    services::providers::{build_http_client, ensure_success, GeocodingProvider},
};

#[derive(Clone)]
pub struct GeocodeMapsProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GeocodeMapsProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            api_key,
            api_url,
        })
    }
}

#[async_trait::async_trait]
impl GeocodingProvider for GeocodeMapsProvider {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> AppResult<LocationInfo> {
        let url = format!("{}/reverse", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let response = ensure_success("Geocoding", response).await?;
        let geocoded: ReverseGeocodeResponse = response.json().await?;

        Ok(LocationInfo::from(geocoded.address))
    }
}
