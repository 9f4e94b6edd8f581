use crate::{
    error::{AppError, AppResult},
    models::{GenreFilter, MovieView},
    services::{catalog::CatalogClient, genres::GenreCatalog},
};

/// Live catalog search, narrowed by the genre filter
///
/// Every surviving result is enriched with trailer and cast before it is
/// returned. The local movie store is not consulted.
pub async fn search_movies(
    catalog: &dyn CatalogClient,
    genres: &GenreCatalog,
    image_base_url: &str,
    query: &str,
    filter: &GenreFilter,
) -> AppResult<Vec<MovieView>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter is missing".to_string(),
        ));
    }

    let results = catalog.search(query).await;
    let total = results.len();
    let mut movies = Vec::new();

    for summary in results
        .into_iter()
        .filter(|summary| filter.admits(&summary.genre_ids))
    {
        let (trailer_url, cast) =
            tokio::join!(catalog.trailer(summary.id), catalog.cast(summary.id));
        let genre_names = genres.names_for(&summary.genre_ids).await;
        let movie = summary.into_movie(image_base_url, genre_names, trailer_url, cast);
        movies.push(MovieView::from(&movie));
    }

    tracing::debug!(
        query = %query,
        total,
        kept = movies.len(),
        "Search results filtered by genre"
    );

    Ok(movies)
}
