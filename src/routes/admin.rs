use axum::{
    extract::State,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use super::Flash;
use crate::{
    error::{AppError, AppResult},
    middleware::{AdminUser, RequestId},
    state::AppState,
};

/// Upper bound on pages per ingestion request; the catalog serves at most 500
const MAX_PAGES: u32 = 500;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/load_movies", get(movie_count).post(load_movies))
        .route("/api/fetch_new_movies", post(fetch_new_movies))
}

#[derive(Debug, Deserialize)]
pub struct LoadMoviesForm {
    num_pages: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FetchNewMoviesRequest {
    #[serde(default = "first_page")]
    num_pages: u32,
    #[serde(default = "first_page")]
    start_page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct MovieCountResponse {
    total_movies: i64,
}

#[derive(Debug, Serialize)]
pub struct LoadMoviesResponse {
    #[serde(flatten)]
    flash: Flash,
    new_movies_count: usize,
    total_movies: i64,
}

#[derive(Debug, Serialize)]
pub struct FetchNewMoviesResponse {
    message: String,
    new_movies_count: usize,
}

fn invalid_pages() -> AppError {
    AppError::InvalidInput("Please enter a valid number of pages.".to_string())
}

fn parse_num_pages(raw: Option<&str>) -> AppResult<u32> {
    let pages: u32 = raw
        .map(str::trim)
        .ok_or_else(invalid_pages)?
        .parse()
        .map_err(|_| invalid_pages())?;

    if pages == 0 || pages > MAX_PAGES {
        return Err(invalid_pages());
    }
    Ok(pages)
}

pub async fn movie_count(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<MovieCountResponse>> {
    Ok(Json(MovieCountResponse {
        total_movies: state.movies.count().await?,
    }))
}

/// Ingests top-rated pages `1..=num_pages`
pub async fn load_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    WithRejection(Form(form), _): WithRejection<Form<LoadMoviesForm>, AppError>,
) -> AppResult<Json<LoadMoviesResponse>> {
    let num_pages = parse_num_pages(form.num_pages.as_deref())?;

    tracing::info!(
        request_id = %request_id,
        admin_id = admin.id,
        num_pages,
        "Bulk movie load requested"
    );

    let new_movies_count = state.ingest(1, num_pages).await?;
    let total_movies = state.movies.count().await?;

    Ok(Json(LoadMoviesResponse {
        flash: Flash::success(format!(
            "Successfully fetched and added {} new movies.",
            new_movies_count
        )),
        new_movies_count,
        total_movies,
    }))
}

/// Ingests `num_pages` top-rated pages starting at `start_page`
pub async fn fetch_new_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    WithRejection(Json(request), _): WithRejection<Json<FetchNewMoviesRequest>, AppError>,
) -> AppResult<Json<FetchNewMoviesResponse>> {
    if request.num_pages == 0 || request.num_pages > MAX_PAGES || request.start_page == 0 {
        return Err(invalid_pages());
    }
    let end_page = request.start_page.saturating_add(request.num_pages - 1);

    tracing::info!(
        request_id = %request_id,
        admin_id = admin.id,
        start_page = request.start_page,
        end_page,
        "Fetching new movies"
    );

    let new_movies_count = state.ingest(request.start_page, end_page).await?;

    Ok(Json(FetchNewMoviesResponse {
        message: format!(
            "Fetched and added {} new movies to the database.",
            new_movies_count
        ),
        new_movies_count,
    }))
}
