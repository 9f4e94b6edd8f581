/// Movie catalog abstraction
///
/// Everything the application knows about movies comes from an external
/// catalog. The trait keeps request handling independent of the HTTP client so
/// tests can substitute canned data.
use std::collections::BTreeMap;

use crate::models::TmdbMovieSummary;

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Read-only access to the external movie catalog
///
/// Lookups are infallible by signature: transport and decoding failures are
/// logged by the implementation and surface as empty results.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Genre id to genre name mapping
    async fn genres(&self) -> BTreeMap<i64, String>;

    /// One page of the top-rated listing
    async fn top_rated(&self, page: u32) -> Vec<TmdbMovieSummary>;

    /// Embed URL of the movie's first YouTube trailer
    async fn trailer(&self, movie_id: i64) -> Option<String>;

    /// Up to five top-billed cast names joined with ", "
    async fn cast(&self, movie_id: i64) -> String;

    /// Free-text movie search
    async fn search(&self, query: &str) -> Vec<TmdbMovieSummary>;
}
