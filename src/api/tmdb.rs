//! TMDB (The Movie Database) API client
//!
//! Owns the HTTP client, the request options and the genre cache. The
//! aggregation queries, logo enrichment and genre loading live in sibling
//! modules as further `impl TmdbClient` blocks.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::genres::GenreCache;
use super::query::QueryParams;
use crate::models::{image_url_with_base, ImageSize, IMAGE_BASE_URL};

/// Default upstream API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TMDB API error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TmdbError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure or any status other than 200
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        TmdbError::InvalidResponse(format!("request failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, TmdbError>;

/// Request options shared by every call
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub image_base_url: String,
    /// `language` parameter for list endpoints
    pub language: String,
    /// Preferred `region` / `watch_region`
    pub region: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// TMDB API client
///
/// Construct once and share by reference (or `Arc`). Call
/// [`TmdbClient::ensure_genres_loaded`] before queries whose subtitles are
/// derived from genre names; until then those subtitles fall back to
/// "No genres available".
pub struct TmdbClient {
    api_key: String,
    options: ClientOptions,
    client: reqwest::Client,
    pub(crate) genres: GenreCache,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_options(
            api_key,
            ClientOptions {
                base_url: base_url.into(),
                ..ClientOptions::default()
            },
        )
    }

    pub fn with_options(api_key: impl Into<String>, options: ClientOptions) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .timeout(options.timeout)
                .build()
                .unwrap_or_default(),
            options,
            genres: GenreCache::new(),
        }
    }

    /// Replace the genre cache (e.g. with a preloaded one)
    pub fn with_genres(mut self, genres: GenreCache) -> Self {
        self.genres = genres;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn genres(&self) -> &GenreCache {
        &self.genres
    }

    /// Resolve a relative artwork path against the configured image host
    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        image_url_with_base(&self.options.image_base_url, path, size)
    }

    /// Language parameter shared by list endpoints
    pub(crate) fn localized(&self) -> QueryParams {
        QueryParams::new().with("language", &self.options.language)
    }

    /// Build the request URL, credential first
    pub(crate) fn build_url(&self, path: &str, params: &QueryParams) -> Result<reqwest::Url> {
        let query = params.clone().prepend("api_key", &self.api_key).encode();
        let raw = format!(
            "{}{}?{}",
            self.options.base_url.trim_end_matches('/'),
            path,
            query
        );

        reqwest::Url::parse(&raw).map_err(|e| {
            TmdbError::InvalidUrl(format!("{}{}: {}", self.options.base_url, path, e))
        })
    }

    /// GET `path` with `params` and decode the JSON body into `T`
    ///
    /// No retries: a failed request fails the call.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T> {
        let url = self.build_url(path, params)?;
        debug!(path, page = params.get("page"), "TMDB request");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(path, status = status.as_u16(), "TMDB request rejected");
            return Err(TmdbError::InvalidResponse(format!(
                "{} returned status {}",
                path,
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(path, error = %e, "TMDB response did not match expected shape");
            TmdbError::Decoding(format!("{}: {}", path, e))
        })
    }
}
