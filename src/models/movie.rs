use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const NO_MOVIES_TITLE: &str = "No movies available with the selected criteria.";

/// A movie ingested from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog (TMDB) identifier, unique across the store
    pub tmdb_id: i64,
    pub title: String,
    /// Vote average in the 0-10 range
    pub score: Option<f64>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub overview: String,
    pub release_date: String,
    pub genres: Vec<String>,
    pub genre_ids: Vec<i64>,
    /// Top billed cast, comma separated
    pub cast: String,
}

impl Movie {
    /// True if any of this movie's genre names is in `names`
    pub fn shares_genre_name(&self, names: &HashSet<String>) -> bool {
        self.genres.iter().any(|genre| names.contains(genre))
    }
}

/// Movie shape returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieView {
    pub id: Option<i64>,
    pub title: String,
    pub score: f64,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub overview: String,
    pub release_date: String,
    pub genres: String,
    pub genre_ids: Vec<i64>,
    pub cast: String,
}

impl MovieView {
    /// Placeholder returned when no movie matches a request
    pub fn none_available() -> Self {
        Self {
            id: None,
            title: NO_MOVIES_TITLE.to_string(),
            score: 0.0,
            poster_url: None,
            trailer_url: None,
            overview: String::new(),
            release_date: String::new(),
            genres: String::new(),
            genre_ids: Vec::new(),
            cast: String::new(),
        }
    }

    /// Rounds the score to two decimals
    pub fn with_rounded_score(mut self) -> Self {
        self.score = (self.score * 100.0).round() / 100.0;
        self
    }
}

impl From<&Movie> for MovieView {
    fn from(movie: &Movie) -> Self {
        Self {
            id: Some(movie.tmdb_id),
            title: movie.title.clone(),
            score: movie.score.unwrap_or(0.0),
            poster_url: movie.poster_url.clone(),
            trailer_url: movie.trailer_url.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            genres: movie.genres.join(", "),
            genre_ids: movie.genre_ids.clone(),
            cast: movie.cast.clone(),
        }
    }
}
