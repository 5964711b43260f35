use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    cached_if_found,
    error::AppResult,
    models::{CatalogId, MovieRecord},
    services::providers::{CatalogProvider, StreamingProvider},
};

/// Jurisdiction whose release certifications are kept on movie records
const CERTIFICATION_COUNTRY: &str = "US";

/// Resolves a free-text title to a catalog id (first search hit wins)
#[derive(Clone)]
pub struct MovieIdentityResolver {
    catalog: Arc<dyn CatalogProvider>,
    cache: Cache,
}

impl MovieIdentityResolver {
    pub fn new(catalog: Arc<dyn CatalogProvider>, cache: Cache) -> Self {
        Self { catalog, cache }
    }

    /// `Ok(None)` when the catalog has no match. Only found ids are cached.
    pub async fn fetch(&self, title: &str) -> AppResult<Option<CatalogId>> {
        cached_if_found!(
            self.cache,
            CacheKey::TitleLookup(title.to_string()),
            async move {
                let results = self.catalog.search_movies(title).await?;
                AppResult::Ok(results.first().map(|hit| hit.id))
            }
        )
    }

    /// Soft lookup: "no match" and upstream faults both yield `None`
    pub async fn resolve(&self, title: &str) -> Option<CatalogId> {
        match self.fetch(title).await {
            Ok(id) => {
                if id.is_none() {
                    tracing::debug!(title = %title, "No catalog match");
                }
                id
            }
            Err(e) => {
                tracing::warn!(error = %e, title = %title, "Error fetching TMDB ID");
                None
            }
        }
    }
}

/// Fetches movie details and enriches them with streaming availability, cast and crew
#[derive(Clone)]
pub struct MovieEnricher {
    catalog: Arc<dyn CatalogProvider>,
    streaming: Arc<dyn StreamingProvider>,
    cache: Cache,
}

impl MovieEnricher {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        streaming: Arc<dyn StreamingProvider>,
        cache: Cache,
    ) -> Self {
        Self {
            catalog,
            streaming,
            cache,
        }
    }

    /// Returns the (possibly degraded) record, `Ok(None)` if the catalog has no such
    /// movie, or the detail call's error.
    ///
    /// A failing streaming lookup does not fail the call: the record is cached and
    /// returned without `streamingProviders`, `cast` or `directors`.
    pub async fn fetch(&self, id: CatalogId) -> AppResult<Option<MovieRecord>> {
        cached_if_found!(self.cache, CacheKey::MovieDetail(id), async move {
            let Some(mut movie) = self.catalog.movie_details(id).await? else {
                return AppResult::Ok(None);
            };
            movie.retain_certifications(CERTIFICATION_COUNTRY);

            match self.streaming.fetch_show(id).await {
                Ok(show) => movie.enrich(show),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        tmdb_id = %id,
                        "Error fetching streaming providers, caching movie without them"
                    );
                }
            }

            Ok(Some(movie))
        })
    }

    /// Soft lookup used by the recommendation pipeline
    pub async fn resolve(&self, id: CatalogId) -> Option<MovieRecord> {
        match self.fetch(id).await {
            Ok(movie) => movie,
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id = %id, "Error fetching movie details");
                None
            }
        }
    }
}
