pub mod friendship;
pub mod genre;
pub mod movie;
pub mod preference;
pub mod tmdb;
pub mod user;

pub use friendship::FriendPair;
pub use genre::{Genre, GenreFilter};
pub use movie::{Movie, MovieView};
pub use preference::MoviePreference;
pub use tmdb::{TmdbCastMember, TmdbGenre, TmdbMovieSummary, TmdbVideo};
pub use user::{User, UserSummary};
