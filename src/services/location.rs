use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::AppResult,
    models::LocationInfo,
    services::providers::GeocodingProvider,
};

/// Resolves coordinates to a city and state, caching by coordinate pair
#[derive(Clone)]
pub struct LocationResolver {
    provider: Arc<dyn GeocodingProvider>,
    cache: Cache,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn GeocodingProvider>, cache: Cache) -> Self {
        Self { provider, cache }
    }

    /// Looks up the location, propagating upstream faults
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> AppResult<LocationInfo> {
        cached!(
            self.cache,
            CacheKey::Location {
                latitude,
                longitude
            },
            async move {
                let location = self.provider.reverse_geocode(latitude, longitude).await?;
                tracing::debug!(
                    city = ?location.city,
                    state = ?location.state,
                    "Reverse geocoding completed"
                );
                AppResult::Ok(location)
            }
        )
    }

    /// Looks up the location; any failure yields `None`
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Option<LocationInfo> {
        match self.fetch(latitude, longitude).await {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!(error = %e, latitude, longitude, "Error fetching city and state");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockGeocodingProvider;

    fn new_york() -> LocationInfo {
        LocationInfo {
            city: Some("New York".to_string()),
            state: Some("New York".to_string()),
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_location() {
        let mut provider = MockGeocodingProvider::new();
        provider
            .expect_reverse_geocode()
            .times(1)
            .returning(|_, _| Ok(new_york()));

        let resolver = LocationResolver::new(Arc::new(provider), Cache::default());
        assert_eq!(resolver.resolve(40.7128, -74.006).await, Some(new_york()));
    }

    #[tokio::test]
    async fn test_second_lookup_is_cache_hit() {
        let mut provider = MockGeocodingProvider::new();
        provider
            .expect_reverse_geocode()
            .times(1)
            .returning(|_, _| Ok(new_york()));

        let resolver = LocationResolver::new(Arc::new(provider), Cache::default());
        let first = resolver.resolve(40.7128, -74.006).await;
        let second = resolver.resolve(40.7128, -74.006).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_coordinates_are_separate_entries() {
        let mut provider = MockGeocodingProvider::new();
        provider
            .expect_reverse_geocode()
            .times(2)
            .returning(|_, _| Ok(new_york()));

        let resolver = LocationResolver::new(Arc::new(provider), Cache::default());
        resolver.resolve(40.7128, -74.006).await;
        resolver.resolve(40.71281, -74.006).await;
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_none_and_is_not_cached() {
        let mut provider = MockGeocodingProvider::new();
        provider
            .expect_reverse_geocode()
            .times(2)
            .returning(|_, _| Err(AppError::ExternalApi("503".to_string())));

        let cache = Cache::default();
        let resolver = LocationResolver::new(Arc::new(provider), cache.clone());
        assert_eq!(resolver.resolve(1.0, 2.0).await, None);
        assert_eq!(resolver.resolve(1.0, 2.0).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_partial_address_is_still_a_result() {
        let mut provider = MockGeocodingProvider::new();
        provider.expect_reverse_geocode().returning(|_, _| {
            Ok(LocationInfo {
                city: None,
                state: Some("Alaska".to_string()),
            })
        });

        let resolver = LocationResolver::new(Arc::new(provider), Cache::default());
        let location = resolver.resolve(64.0, -150.0).await.unwrap();
        assert_eq!(location.city, None);
        assert_eq!(location.state.as_deref(), Some("Alaska"));
    }
}
