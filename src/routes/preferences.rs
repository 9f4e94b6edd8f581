use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::Flash;
use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movie-preference", post(set_preference))
        .route("/liked-movies", get(liked_movies))
}

#[derive(Debug, Deserialize)]
pub struct PreferenceRequest {
    title: Option<String>,
    id: Option<i64>,
    genres: Option<String>,
    #[serde(alias = "liked")]
    preference: Option<bool>,
}

pub async fn set_preference(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(request), _): WithRejection<Json<PreferenceRequest>, AppError>,
) -> AppResult<Flash> {
    let (Some(title), Some(tmdb_id), Some(genres), Some(liked)) = (
        request.title.filter(|t| !t.trim().is_empty()),
        request.id,
        request.genres,
        request.preference,
    ) else {
        return Err(AppError::InvalidInput(
            "Missing movie title, ID, genres or preference".to_string(),
        ));
    };

    state
        .preferences
        .set_preference(user.id, &title, tmdb_id, &genres, liked)
        .await?;

    Ok(Flash::success("Preference saved successfully"))
}

/// Titles the caller has liked
pub async fn liked_movies(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.preferences.liked_titles(user.id).await?))
}
