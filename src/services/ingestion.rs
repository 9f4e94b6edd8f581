use crate::{
    error::AppResult,
    services::{catalog::CatalogClient, genres::GenreCatalog, movie_store::MovieStore},
};

/// Pulls top-rated catalog pages into the movie store
///
/// For each page in `start_page..=end_page`, well-rated summaries that are not
/// stored yet are enriched with trailer, cast and genre names and persisted.
/// A page the catalog cannot deliver contributes nothing and the loop moves
/// on, as does a single movie the store refuses. Returns the number of movies
/// added.
pub async fn ingest_top_rated(
    catalog: &dyn CatalogClient,
    store: &MovieStore,
    genres: &GenreCatalog,
    image_base_url: &str,
    start_page: u32,
    end_page: u32,
) -> AppResult<usize> {
    genres.ensure_loaded(catalog).await;

    let mut added = 0;

    for page in start_page..=end_page {
        let summaries = catalog.top_rated(page).await;
        let mut page_added = 0;

        for summary in summaries.into_iter().filter(|s| s.is_well_rated()) {
            if store.contains(summary.id).await? {
                continue;
            }

            let (trailer_url, cast) =
                tokio::join!(catalog.trailer(summary.id), catalog.cast(summary.id));
            let genre_names = genres.names_for(&summary.genre_ids).await;
            let movie = summary.into_movie(image_base_url, genre_names, trailer_url, cast);

            // Lost a race with a concurrent ingestion: the other writer's row stays.
            match store.insert(&movie).await {
                Ok(true) => page_added += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        page,
                        movie_id = movie.tmdb_id,
                        "Skipping movie the store rejected"
                    );
                }
            }
        }

        tracing::debug!(page, added = page_added, "Ingested top-rated page");
        added += page_added;
    }

    tracing::info!(
        start_page,
        end_page,
        added,
        "Fetched and added new movies to the store"
    );

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::create_pool,
        models::TmdbMovieSummary,
        services::catalog::MockCatalogClient,
    };
    use std::collections::BTreeMap;
    use tokio_test::assert_ok;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500/";

    fn summary(id: i64, title: &str, vote_count: i64, genre_ids: Vec<i64>) -> TmdbMovieSummary {
        TmdbMovieSummary {
            id,
            title: title.to_string(),
            vote_average: Some(8.0),
            vote_count: Some(vote_count),
            poster_path: Some(format!("/path{}.jpg", id)),
            overview: Some(format!("Overview {}", title)),
            release_date: Some("2023-01-01".to_string()),
            genre_ids,
        }
    }

    fn mock_catalog() -> MockCatalogClient {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_genres().returning(|| {
            BTreeMap::from([(28, "Action".to_string()), (35, "Comedy".to_string())])
        });
        catalog.expect_top_rated().returning(|page| match page {
            1 => vec![
                summary(1, "Movie A", 100, vec![28]),
                summary(2, "Movie B", 60, vec![35, 28]),
                summary(9, "Obscure", 10, vec![35]),
            ],
            _ => Vec::new(),
        });
        catalog
            .expect_trailer()
            .returning(|id| Some(format!("https://www.youtube.com/embed/trailer{}", id)));
        catalog
            .expect_cast()
            .returning(|id| format!("Actor {}", id));
        catalog
    }

    async fn fixtures() -> (MovieStore, GenreCatalog) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        (MovieStore::new(pool), GenreCatalog::new())
    }

    #[tokio::test]
    async fn test_ingest_enriches_and_stores() {
        let catalog = mock_catalog();
        let (store, genres) = fixtures().await;

        let added = assert_ok!(ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 1).await);
        assert_eq!(added, 2);

        let movies = store.all().await.unwrap();
        assert_eq!(movies.len(), 2);
        let movie_b = movies.iter().find(|m| m.tmdb_id == 2).unwrap();
        assert_eq!(movie_b.genres, vec!["Comedy".to_string(), "Action".to_string()]);
        assert_eq!(movie_b.genre_ids, vec![35, 28]);
        assert_eq!(movie_b.cast, "Actor 2");
        assert_eq!(
            movie_b.trailer_url.as_deref(),
            Some("https://www.youtube.com/embed/trailer2")
        );
        assert_eq!(
            movie_b.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/path2.jpg")
        );
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let catalog = mock_catalog();
        let (store, genres) = fixtures().await;

        assert_eq!(
            ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 1).await.unwrap(),
            2
        );
        assert_eq!(
            ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 1).await.unwrap(),
            0
        );
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_known_movies_are_not_enriched_again() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_genres().returning(BTreeMap::new);
        catalog
            .expect_top_rated()
            .returning(|_| vec![summary(1, "Movie A", 100, vec![28])]);
        catalog.expect_trailer().times(1).returning(|_| None);
        catalog.expect_cast().times(1).returning(|_| String::new());

        let (store, genres) = fixtures().await;
        ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 1).await.unwrap();
        ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_out_of_range_score_does_not_stop_the_run() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_genres().returning(BTreeMap::new);
        catalog.expect_top_rated().returning(|page| match page {
            1 => {
                let mut broken = summary(10, "Broken Score", 500, vec![]);
                broken.vote_average = Some(10.5);
                vec![broken]
            }
            2 => vec![summary(20, "Page Two", 500, vec![])],
            _ => Vec::new(),
        });
        catalog.expect_trailer().returning(|_| None);
        catalog.expect_cast().returning(|_| String::new());

        let (store, genres) = fixtures().await;
        let added = assert_ok!(ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 2).await);
        assert_eq!(added, 1);

        let movies = store.all().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Page Two");
    }

    #[tokio::test]
    async fn test_failed_page_contributes_nothing() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_genres().returning(BTreeMap::new);
        catalog.expect_top_rated().returning(|page| match page {
            2 => vec![summary(20, "Page Two", 500, vec![])],
            _ => Vec::new(),
        });
        catalog.expect_trailer().returning(|_| None);
        catalog.expect_cast().returning(|_| String::new());

        let (store, genres) = fixtures().await;
        let added = ingest_top_rated(&catalog, &store, &genres, IMAGE_BASE, 1, 3)
            .await
            .unwrap();
        assert_eq!(added, 1);

        let movie = &store.all().await.unwrap()[0];
        assert_eq!(movie.title, "Page Two");
        assert!(movie.genres.is_empty());
        assert_eq!(movie.trailer_url, None);
    }
}
