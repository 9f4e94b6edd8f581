// ============================================================================
// TMDB API Types
// ============================================================================

use serde::Deserialize;

use super::Movie;

/// Summaries with this many votes or fewer are not ingested
pub const MIN_VOTE_COUNT: i64 = 50;

/// Scores live on a 0 to 10 scale
pub const MAX_SCORE: f64 = 10.0;

pub const DEFAULT_OVERVIEW: &str = "No overview available.";
pub const DEFAULT_RELEASE_DATE: &str = "N/A";

/// GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Option<Vec<TmdbGenre>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

/// Any TMDB response carrying a top-level `results` array
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResults<T> {
    pub results: Option<Vec<T>>,
}

/// Movie entry of the top-rated and search listings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl TmdbMovieSummary {
    /// Has a non-zero, in-range score backed by enough votes to be worth storing
    pub fn is_well_rated(&self) -> bool {
        self.vote_average
            .is_some_and(|score| score > 0.0 && score <= MAX_SCORE)
            && self.vote_count.unwrap_or(0) > MIN_VOTE_COUNT
    }

    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url, path.trim_start_matches('/')))
    }

    /// Builds a store record from the summary plus enrichment lookups
    pub fn into_movie(
        self,
        image_base_url: &str,
        genre_names: Vec<String>,
        trailer_url: Option<String>,
        cast: String,
    ) -> Movie {
        let poster_url = self.poster_url(image_base_url);
        Movie {
            tmdb_id: self.id,
            title: self.title,
            score: self.vote_average,
            poster_url,
            trailer_url,
            overview: self
                .overview
                .unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
            release_date: self
                .release_date
                .unwrap_or_else(|| DEFAULT_RELEASE_DATE.to_string()),
            genres: genre_names,
            genre_ids: self.genre_ids,
            cast,
        }
    }
}

/// Entry of GET /movie/{id}/videos
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbVideo {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub key: String,
}

impl TmdbVideo {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.video_type == "Trailer" && !self.key.is_empty()
    }
}

/// GET /movie/{id}/credits
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    pub cast: Option<Vec<TmdbCastMember>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbCastMember {
    pub name: String,
}
