/// TMDB movie catalog provider
///
/// Search: `GET /search/movie` → ranked hits.
/// Detail: `GET /movie/{id}?append_to_response=release_dates` → full movie document.
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    error::AppResult,
    models::{CatalogId, CatalogSearchResponse, CatalogSearchResult, MovieRecord},
    services::providers::{build_http_client, ensure_success, CatalogProvider},
};

const API_NAME: &str = "TMDB";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            api_key,
            api_url,
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchResult>> {
        let url = format!("{}/search/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        let response = ensure_success(API_NAME, response).await?;
        let search: CatalogSearchResponse = response.json().await?;

        tracing::info!(
            query = %query,
            results = search.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(search.results)
    }

    async fn movie_details(&self, id: CatalogId) -> AppResult<Option<MovieRecord>> {
        let url = format!("{}/movie/{}", self.api_url, id);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("append_to_response", "release_dates"),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!(tmdb_id = %id, provider = "tmdb", "Movie not found");
            return Ok(None);
        }

        let response = ensure_success(API_NAME, response).await?;
        let movie: MovieRecord = response.json().await?;

        tracing::debug!(tmdb_id = %id, provider = "tmdb", "Movie details fetched");

        Ok(Some(movie))
    }
}
