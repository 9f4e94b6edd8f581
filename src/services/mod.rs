pub mod accounts;
pub mod catalog;
pub mod genres;
pub mod ingestion;
pub mod movie_store;
pub mod preferences;
pub mod recommendations;
pub mod search;
pub mod social;

pub use accounts::Accounts;
pub use catalog::{CatalogClient, TmdbClient};
pub use genres::GenreCatalog;
pub use movie_store::MovieStore;
pub use preferences::PreferenceLedger;
pub use social::SocialGraph;
