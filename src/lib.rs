//! Huuqo - streaming discovery over TMDB
//!
//! Fetches trending, popular, upcoming and per-provider catalogs, normalizes
//! them into one display record, attaches title logos and pages through
//! search results.
//!
//! # Modules
//!
//! - `models` - Display records, pages, providers and artwork
//! - `api` - TMDB client, genre cache, logo enrichment and catalog queries
//! - `feeds` - Whole-screen loads with cross-row de-duplication
//! - `pager` - Incremental search paging
//! - `config` - Config file and API key
//! - `cli` / `commands` - Scriptable command-line front end

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod feeds;
pub mod models;
pub mod pager;

// Re-export commonly used types
pub use models::{
    ContentKind, Genre, ImageAsset, ImageSize, PagedResult, Provider, UnifiedContent,
};

pub use api::{ClientOptions, GenreCache, TmdbClient, TmdbError};
pub use config::Config;
pub use feeds::{CatalogFeed, GenreFeed, HomeFeed};
pub use pager::{PageSource, RecommendedSource, SearchPager, SearchSource};
