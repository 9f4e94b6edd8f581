/// TMDB catalog client
///
/// Endpoints used:
/// 1. Genres: /genre/movie/list
/// 2. Top rated listing: /movie/top_rated?page=N
/// 3. Trailer lookup: /movie/{id}/videos
/// 4. Cast lookup: /movie/{id}/credits
/// 5. Free-text search: /search/movie?query=...
use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbCredits, TmdbGenreList, TmdbResults},
        TmdbMovieSummary, TmdbVideo,
    },
    services::catalog::CatalogClient,
};

pub const YOUTUBE_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

const CAST_LIMIT: usize = 5;
const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    /// Creates a client whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{api_url}{path}` with the API key and language attached
    async fn fetch<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}: {}",
                status, path, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Raw TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response for {}: {}", path, e))
        })
    }

    /// Unwraps a `results` listing, logging and degrading to empty on failure
    async fn fetch_results<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Vec<T> {
        match self.fetch::<TmdbResults<T>>(path, params).await {
            Ok(TmdbResults {
                results: Some(results),
            }) => results,
            Ok(TmdbResults { results: None }) => {
                tracing::debug!(path = %path, "TMDB response missing 'results'");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path, "TMDB request failed");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn genres(&self) -> BTreeMap<i64, String> {
        match self.fetch::<TmdbGenreList>("/genre/movie/list", &[]).await {
            Ok(TmdbGenreList {
                genres: Some(genres),
            }) => {
                tracing::info!(genres = genres.len(), "Genre list fetched");
                genres.into_iter().map(|g| (g.id, g.name)).collect()
            }
            Ok(TmdbGenreList { genres: None }) => {
                tracing::debug!("TMDB genre response missing 'genres'");
                BTreeMap::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch genres");
                BTreeMap::new()
            }
        }
    }

    async fn top_rated(&self, page: u32) -> Vec<TmdbMovieSummary> {
        let page = page.to_string();
        self.fetch_results("/movie/top_rated", &[("page", page.as_str())])
            .await
    }

    async fn trailer(&self, movie_id: i64) -> Option<String> {
        let videos: Vec<TmdbVideo> = self
            .fetch_results(&format!("/movie/{}/videos", movie_id), &[])
            .await;

        let trailer = videos
            .into_iter()
            .find(TmdbVideo::is_youtube_trailer)
            .map(|video| format!("{}{}", YOUTUBE_EMBED_BASE_URL, video.key));

        if trailer.is_none() {
            tracing::debug!(movie_id, "No trailer found");
        }
        trailer
    }

    async fn cast(&self, movie_id: i64) -> String {
        let path = format!("/movie/{}/credits", movie_id);
        match self.fetch::<TmdbCredits>(&path, &[]).await {
            Ok(TmdbCredits { cast: Some(cast) }) => cast
                .into_iter()
                .take(CAST_LIMIT)
                .map(|member| member.name)
                .collect::<Vec<_>>()
                .join(", "),
            Ok(TmdbCredits { cast: None }) => {
                tracing::debug!(movie_id, "TMDB credits response missing 'cast'");
                String::new()
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id, "Failed to fetch cast");
                String::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Vec<TmdbMovieSummary> {
        let results: Vec<TmdbMovieSummary> = self
            .fetch_results("/search/movie", &[("query", query)])
            .await;

        tracing::info!(
            query = %query,
            results = results.len(),
            "Catalog search completed"
        );

        results
    }
}
