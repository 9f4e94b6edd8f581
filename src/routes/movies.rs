use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::{MaybeUser, RequestId},
    models::{Genre, GenreFilter, MovieView},
    services::{recommendations, search},
    state::AppState,
};

const MAX_PER_PAGE: u32 = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/genres", get(list_genres))
        .route("/random-movie", get(random_movie))
        .route("/search-movie", get(search_movie))
        .route("/api/movies", get(list_movies))
}

#[derive(Debug, Deserialize)]
pub struct RandomMovieQuery {
    genres: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
    genres: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Genre id/name pairs, fetched from the catalog if not yet known
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<Genre>> {
    state.genres.ensure_loaded(state.catalog.as_ref()).await;
    Json(state.genres.list().await)
}

/// One movie from the store, biased towards genres the caller has liked
pub async fn random_movie(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    WithRejection(Query(params), _): WithRejection<Query<RandomMovieQuery>, AppError>,
) -> AppResult<Json<MovieView>> {
    let filter = GenreFilter::parse(params.genres.as_deref())?;

    let liked_genres = match &user {
        Some(user) => state.preferences.liked_genre_names(user.id).await?,
        None => Default::default(),
    };
    let movies = state.movies.all().await?;

    let view = recommendations::pick_random(&movies, &liked_genres, &filter, &mut rand::rng());
    tracing::debug!(
        user_id = user.as_ref().map(|u| u.id),
        movie_id = view.id,
        "Random movie selected"
    );

    Ok(Json(view))
}

/// Live catalog search filtered by genre
pub async fn search_movie(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<MovieView>>> {
    let filter = GenreFilter::parse(params.genres.as_deref())?;

    let results = search::search_movies(
        state.catalog.as_ref(),
        &state.genres,
        &state.image_base_url,
        params.query.as_deref().unwrap_or_default(),
        &filter,
    )
    .await?;

    Ok(Json(results))
}

/// A page of stored movies; an empty page pulls the matching catalog page first
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    WithRejection(Query(params), _): WithRejection<Query<PageQuery>, AppError>,
) -> AppResult<Json<Vec<MovieView>>> {
    if params.page == 0 || params.per_page == 0 || params.per_page > MAX_PER_PAGE {
        return Err(AppError::InvalidInput(format!(
            "page must be at least 1 and per_page between 1 and {}",
            MAX_PER_PAGE
        )));
    }

    let mut movies = state.movies.page(params.page, params.per_page).await?;

    if movies.is_empty() {
        tracing::info!(
            request_id = %request_id,
            page = params.page,
            "Movie page empty, fetching from catalog"
        );
        state.ingest(params.page, params.page).await?;
        movies = state.movies.page(params.page, params.per_page).await?;
    }

    Ok(Json(movies.iter().map(MovieView::from).collect()))
}
