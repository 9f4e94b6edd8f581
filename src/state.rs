use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        ingestion, Accounts, CatalogClient, GenreCatalog, MovieStore, PreferenceLedger,
        SocialGraph,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub catalog: Arc<dyn CatalogClient>,
    pub genres: GenreCatalog,
    pub movies: MovieStore,
    pub accounts: Accounts,
    pub preferences: PreferenceLedger,
    pub social: SocialGraph,
    pub image_base_url: Arc<str>,
}

impl AppState {
    /// Wires every store onto one pool and one catalog client
    pub fn new(db_pool: SqlitePool, catalog: Arc<dyn CatalogClient>, config: &Config) -> Self {
        let preferences = PreferenceLedger::new(db_pool.clone());
        Self {
            catalog,
            genres: GenreCatalog::new(),
            movies: MovieStore::new(db_pool.clone()),
            accounts: Accounts::new(
                db_pool.clone(),
                config.admin_usernames.clone(),
                chrono::Duration::hours(config.session_ttl_hours),
            ),
            social: SocialGraph::new(db_pool.clone(), preferences.clone()),
            preferences,
            image_base_url: Arc::from(config.tmdb_image_base_url.as_str()),
            db_pool,
        }
    }

    /// Ingests top-rated pages `start_page..=end_page` into the movie store
    pub async fn ingest(&self, start_page: u32, end_page: u32) -> AppResult<usize> {
        ingestion::ingest_top_rated(
            self.catalog.as_ref(),
            &self.movies,
            &self.genres,
            &self.image_base_url,
            start_page,
            end_page,
        )
        .await
    }
}
