use sqlx::SqlitePool;

use crate::{error::AppResult, models::Movie};

/// Row shape of the `movies` table; list columns are stored as ", " joined text
#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    tmdb_id: i64,
    title: String,
    score: Option<f64>,
    poster_url: Option<String>,
    trailer_url: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    genres: String,
    genre_ids: String,
    top_cast: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            tmdb_id: row.tmdb_id,
            title: row.title,
            score: row.score,
            poster_url: row.poster_url,
            trailer_url: row.trailer_url,
            overview: row.overview.unwrap_or_default(),
            release_date: row.release_date.unwrap_or_default(),
            genres: split_list(&row.genres).map(str::to_string).collect(),
            genre_ids: split_list(&row.genre_ids)
                .filter_map(|id| id.parse().ok())
                .collect(),
            cast: row.top_cast,
        }
    }
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

const MOVIE_COLUMNS: &str = "tmdb_id, title, score, poster_url, trailer_url, overview, \
                             release_date, genres, genre_ids, top_cast";

/// Persistent set of ingested movies, unique by catalog id
#[derive(Clone)]
pub struct MovieStore {
    pool: SqlitePool,
}

impl MovieStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn contains(&self, tmdb_id: i64) -> AppResult<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM movies WHERE tmdb_id = ?")
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Stores a movie unless its catalog id is already present
    ///
    /// Returns whether a row was written.
    pub async fn insert(&self, movie: &Movie) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO movies (tmdb_id, title, score, poster_url, trailer_url, overview,
                                release_date, genres, genre_ids, top_cast)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(tmdb_id) DO NOTHING
            "#,
        )
        .bind(movie.tmdb_id)
        .bind(&movie.title)
        .bind(movie.score)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .bind(&movie.overview)
        .bind(&movie.release_date)
        .bind(movie.genres.join(", "))
        .bind(join_ids(&movie.genre_ids))
        .bind(&movie.cast)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn all(&self) -> AppResult<Vec<Movie>> {
        let rows: Vec<MovieRow> =
            sqlx::query_as(&format!("SELECT {} FROM movies ORDER BY id", MOVIE_COLUMNS))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// One page of movies in ingestion order; `page` starts at 1
    pub async fn page(&self, page: u32, per_page: u32) -> AppResult<Vec<Movie>> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
        let rows: Vec<MovieRow> = sqlx::query_as(&format!(
            "SELECT {} FROM movies ORDER BY id LIMIT ? OFFSET ?",
            MOVIE_COLUMNS
        ))
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
