//! Raw TMDB response records
//!
//! Field names are the upstream wire names; renames are spelled out where the
//! wire name is not a valid or readable Rust identifier. Optional upstream
//! fields decode to `None` or an empty default instead of failing the page.

use serde::Deserialize;

use crate::models::{Genre, ImageAsset};

fn first_page() -> u32 {
    1
}

/// Paged list endpoints (trending, popular, upcoming, discover, search)
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<RawContent>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Movie or TV record as returned by list endpoints
///
/// Movies carry `title`/`release_date`, TV shows carry `name`/`first_air_date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub media_type: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// `/genre/{movie,tv}/list`
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

/// `/{movie,tv}/{id}/images`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub logos: Vec<ImageAsset>,
    #[serde(default)]
    pub posters: Vec<ImageAsset>,
    #[serde(default)]
    pub backdrops: Vec<ImageAsset>,
}

/// `/movie/{id}/release_dates`
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDatesResponse {
    pub results: Vec<CountryReleases>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryReleases {
    #[serde(rename = "iso_3166_1")]
    pub country: String,
    pub release_dates: Vec<ReleaseDateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDateEntry {
    #[serde(default)]
    pub certification: String,
    #[serde(rename = "type", default)]
    pub release_type: u8,
}

/// `/tv/{id}/content_ratings`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRatingsResponse {
    pub results: Vec<ContentRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRating {
    #[serde(rename = "iso_3166_1")]
    pub country: String,
    #[serde(default)]
    pub rating: String,
}
