use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Optional genre-id filter taken from a `genres=28,35` query parameter
///
/// An empty filter admits every movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreFilter(BTreeSet<i64>);

impl GenreFilter {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .map_err(|_| AppError::InvalidInput(format!("Invalid genre id: {}", part)))
            })
            .collect::<AppResult<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the filter is empty or shares at least one id with `genre_ids`
    pub fn admits(&self, genre_ids: &[i64]) -> bool {
        self.0.is_empty() || genre_ids.iter().any(|id| self.0.contains(id))
    }
}

impl FromIterator<i64> for GenreFilter {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
