use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{models::Genre, services::catalog::CatalogClient};

/// Shared genre id → name mapping
///
/// Loaded from the catalog at startup and read by ingestion, search and the
/// `/genres` endpoint. A failed refresh keeps the previous mapping.
#[derive(Clone, Default)]
pub struct GenreCatalog {
    inner: Arc<RwLock<BTreeMap<i64, String>>>,
}

impl GenreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: BTreeMap<i64, String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Replaces the mapping with a fresh copy from the catalog
    ///
    /// Returns the number of known genres afterwards.
    pub async fn refresh(&self, catalog: &dyn CatalogClient) -> usize {
        let fetched = catalog.genres().await;
        let mut inner = self.inner.write().await;
        if fetched.is_empty() {
            tracing::warn!(
                known = inner.len(),
                "Catalog returned no genres, keeping current mapping"
            );
        } else {
            *inner = fetched;
        }
        inner.len()
    }

    /// Refreshes only if nothing has been loaded yet
    pub async fn ensure_loaded(&self, catalog: &dyn CatalogClient) {
        if self.inner.read().await.is_empty() {
            self.refresh(catalog).await;
        }
    }

    pub async fn list(&self) -> Vec<Genre> {
        self.inner
            .read()
            .await
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    /// Names for the ids the mapping knows, in input order
    pub async fn names_for(&self, ids: &[i64]) -> Vec<String> {
        let inner = self.inner.read().await;
        ids.iter().filter_map(|id| inner.get(id).cloned()).collect()
    }
}
