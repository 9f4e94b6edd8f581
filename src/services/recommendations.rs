use std::collections::HashSet;

use rand::{seq::IndexedRandom, Rng};

use crate::models::{GenreFilter, Movie, MovieView};

/// Narrows the store to the movies worth recommending
///
/// Movies sharing a genre name with the user's liked genres (and passing the
/// filter) win. When there are none, every movie passing the filter is a
/// candidate, which is the whole store for an empty filter.
pub fn candidates<'a>(
    movies: &'a [Movie],
    liked_genres: &HashSet<String>,
    filter: &GenreFilter,
) -> Vec<&'a Movie> {
    let preferred: Vec<&Movie> = movies
        .iter()
        .filter(|movie| movie.shares_genre_name(liked_genres) && filter.admits(&movie.genre_ids))
        .collect();

    if !preferred.is_empty() {
        return preferred;
    }

    movies
        .iter()
        .filter(|movie| filter.admits(&movie.genre_ids))
        .collect()
}

/// Picks one candidate uniformly at random, or the "no movies" placeholder
pub fn pick_random<R: Rng + ?Sized>(
    movies: &[Movie],
    liked_genres: &HashSet<String>,
    filter: &GenreFilter,
    rng: &mut R,
) -> MovieView {
    candidates(movies, liked_genres, filter)
        .choose(rng)
        .map(|movie| MovieView::from(*movie).with_rounded_score())
        .unwrap_or_else(MovieView::none_available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::NO_MOVIES_TITLE;
    use rand::{rngs::StdRng, SeedableRng};

    fn movie(tmdb_id: i64, title: &str, genres: &[(i64, &str)]) -> Movie {
        Movie {
            tmdb_id,
            title: title.to_string(),
            score: Some(8.0),
            poster_url: None,
            trailer_url: None,
            overview: String::new(),
            release_date: String::new(),
            genres: genres.iter().map(|(_, name)| name.to_string()).collect(),
            genre_ids: genres.iter().map(|(id, _)| *id).collect(),
            cast: String::new(),
        }
    }

    fn store() -> Vec<Movie> {
        vec![
            movie(1, "Movie A", &[(28, "Action")]),
            movie(2, "Movie B", &[(35, "Comedy")]),
            movie(3, "Movie C", &[(28, "Action"), (35, "Comedy")]),
        ]
    }

    fn names(genres: &[&str]) -> HashSet<String> {
        genres.iter().map(|g| g.to_string()).collect()
    }

    fn titles(movies: Vec<&Movie>) -> Vec<&str> {
        movies.into_iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_liked_genres_take_priority() {
        let movies = store();
        let picked = candidates(&movies, &names(&["Action"]), &GenreFilter::default());
        assert_eq!(titles(picked), vec!["Movie A", "Movie C"]);
    }

    #[test]
    fn test_liked_genres_combined_with_filter() {
        let movies = store();
        let filter = GenreFilter::from_iter([35]);
        let picked = candidates(&movies, &names(&["Action"]), &filter);
        assert_eq!(titles(picked), vec!["Movie C"]);
    }

    #[test]
    fn test_falls_back_to_filter_without_overlap() {
        let movies = store();
        let filter = GenreFilter::from_iter([35]);
        let picked = candidates(&movies, &names(&["Horror"]), &filter);
        assert_eq!(titles(picked), vec!["Movie B", "Movie C"]);
    }

    #[test]
    fn test_falls_back_to_whole_store() {
        let movies = store();
        let picked = candidates(&movies, &HashSet::new(), &GenreFilter::default());
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_filter_matching_nothing_is_empty() {
        let movies = store();
        let filter = GenreFilter::from_iter([99]);
        assert!(candidates(&movies, &HashSet::new(), &filter).is_empty());
    }

    #[test]
    fn test_genre_filter_always_picks_matching_movie() {
        let movies = vec![
            movie(1, "Movie A", &[(28, "Action")]),
            movie(2, "Movie B", &[(35, "Comedy")]),
        ];
        let filter = GenreFilter::from_iter([28]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let view = pick_random(&movies, &HashSet::new(), &filter, &mut rng);
            assert_eq!(view.title, "Movie A");
        }
    }

    #[test]
    fn test_pick_covers_all_candidates() {
        let movies = store();
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<i64> = (0..200)
            .filter_map(|_| pick_random(&movies, &HashSet::new(), &GenreFilter::default(), &mut rng).id)
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_store_yields_placeholder() {
        let mut rng = StdRng::seed_from_u64(1);
        let view = pick_random(&[], &names(&["Action"]), &GenreFilter::default(), &mut rng);
        assert_eq!(view.id, None);
        assert_eq!(view.title, NO_MOVIES_TITLE);
        assert_eq!(view.score, 0.0);
    }

    #[test]
    fn test_score_rounded() {
        let mut movies = vec![movie(1, "Movie A", &[(28, "Action")])];
        movies[0].score = Some(8.4567);
        let mut rng = StdRng::seed_from_u64(1);
        let view = pick_random(&movies, &HashSet::new(), &GenreFilter::default(), &mut rng);
        assert_eq!(view.score, 8.46);
    }
}
