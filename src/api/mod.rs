//! TMDB client
//!
//! - `tmdb`: client, options, errors and the JSON fetch helper
//! - `query`: query-string builder
//! - `wire`: raw response records
//! - `normalize`: raw records to display records
//! - `genres`: genre cache
//! - `images`: logo enrichment
//! - `catalog`: aggregation queries

pub mod catalog;
pub mod genres;
pub mod images;
pub mod normalize;
pub mod query;
pub mod tmdb;
pub mod wire;

pub use genres::GenreCache;
pub use query::QueryParams;
pub use tmdb::{ClientOptions, TmdbClient, TmdbError};
