use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::CatalogSearchResult,
    services::providers::CatalogProvider,
};

/// Free-text catalog search for the title picker
///
/// Results are filtered to displayable hits and cached per query.
#[derive(Clone)]
pub struct TitleSearcher {
    catalog: Arc<dyn CatalogProvider>,
    cache: Cache,
}

impl TitleSearcher {
    pub fn new(catalog: Arc<dyn CatalogProvider>, cache: Cache) -> Self {
        Self { catalog, cache }
    }

    /// Returns `NotFound` only when the catalog itself has no hits; a query whose hits
    /// are all filtered out yields an empty list.
    pub async fn search(&self, query: &str) -> AppResult<Vec<CatalogSearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Query parameter 'q' must not be empty".to_string(),
            ));
        }

        cached!(self.cache, CacheKey::SearchQuery(query.to_string()), async move {
            let results = self.catalog.search_movies(query).await?;
            if results.is_empty() {
                return Err(AppError::NotFound(
                    "No movies found for the given query".to_string(),
                ));
            }

            let total = results.len();
            let displayable: Vec<CatalogSearchResult> = results
                .into_iter()
                .filter(CatalogSearchResult::is_displayable)
                .collect();
            tracing::debug!(
                query = %query,
                total,
                kept = displayable.len(),
                "Filtered catalog search results"
            );

            AppResult::Ok(displayable)
        })
    }
}
