use serde::Serialize;

/// A user's like or dislike of a movie title
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct MoviePreference {
    pub id: i64,
    pub user_id: i64,
    pub movie_title: String,
    pub tmdb_id: Option<i64>,
    /// Genre names as submitted, e.g. "Action, Adventure"
    pub genres: Option<String>,
    pub liked: bool,
}

impl MoviePreference {
    /// Individual genre names of this preference
    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
