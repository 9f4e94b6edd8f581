use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::{error::AppResult, models::MoviePreference};

/// Per-user like/dislike record, one row per (user, movie title)
#[derive(Clone)]
pub struct PreferenceLedger {
    pool: SqlitePool,
}

impl PreferenceLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a preference, overwriting any earlier one for the same title
    pub async fn set_preference(
        &self,
        user_id: i64,
        title: &str,
        tmdb_id: i64,
        genres: &str,
        liked: bool,
    ) -> AppResult<MoviePreference> {
        let preference = sqlx::query_as(
            r#"
            INSERT INTO movie_preferences (user_id, movie_title, tmdb_id, genres, liked)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, movie_title) DO UPDATE SET
                tmdb_id = excluded.tmdb_id,
                genres = excluded.genres,
                liked = excluded.liked
            RETURNING id, user_id, movie_title, tmdb_id, genres, liked
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(tmdb_id)
        .bind(genres)
        .bind(liked)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id, title = %title, liked, "Preference saved");
        Ok(preference)
    }

    pub async fn preferences(&self, user_id: i64) -> AppResult<Vec<MoviePreference>> {
        let preferences = sqlx::query_as(
            "SELECT id, user_id, movie_title, tmdb_id, genres, liked \
             FROM movie_preferences WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(preferences)
    }

    /// Titles the user currently likes
    pub async fn liked_titles(&self, user_id: i64) -> AppResult<Vec<String>> {
        let titles: Vec<(String,)> = sqlx::query_as(
            "SELECT movie_title FROM movie_preferences WHERE user_id = ? AND liked ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(titles.into_iter().map(|(title,)| title).collect())
    }

    /// Union of the genre names across the user's liked movies
    pub async fn liked_genre_names(&self, user_id: i64) -> AppResult<HashSet<String>> {
        let names = self
            .preferences(user_id)
            .await?
            .iter()
            .filter(|preference| preference.liked)
            .flat_map(|preference| preference.genre_names().map(str::to_string))
            .collect();
        Ok(names)
    }
}
