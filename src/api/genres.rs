//! Genre cache
//!
//! Holds the union of the movie and TV genre taxonomies. Population is
//! all-or-nothing and happens at most once per cache unless
//! [`GenreCache::refresh`] is called: concurrent first callers serialize on a
//! load guard, and whoever gets it second sees the cache already filled.

use std::future::Future;
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::query::QueryParams;
use super::tmdb::{Result, TmdbClient, TmdbError};
use super::wire::GenreList;
use crate::models::Genre;

/// Process-wide genre lookup table, owned by the client
#[derive(Debug, Default)]
pub struct GenreCache {
    genres: RwLock<Option<Vec<Genre>>>,
    load_guard: Mutex<()>,
}

impl GenreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that is already populated from the two taxonomies
    pub fn preloaded(movie: Vec<Genre>, tv: Vec<Genre>) -> Self {
        Self {
            genres: RwLock::new(Some(merge_genres(movie, tv))),
            load_guard: Mutex::new(()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the merged genre list, in insertion order
    pub fn snapshot(&self) -> Vec<Genre> {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    /// Genre name for an id
    pub fn resolve_name(&self, id: u32) -> Option<String> {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()?
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.clone())
    }

    /// Names for a list of ids, in the order given; unknown ids are skipped
    pub fn resolve_names(&self, ids: &[u32]) -> Vec<String> {
        let guard = self.genres.read().unwrap_or_else(PoisonError::into_inner);
        let Some(genres) = guard.as_ref() else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| genres.iter().find(|g| g.id == *id))
            .map(|g| g.name.clone())
            .collect()
    }

    /// Case-insensitive name lookup
    pub fn find_id(&self, name: &str) -> Option<u32> {
        self.genres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()?
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .map(|g| g.id)
    }

    /// Populate the cache with `fetch` unless it is already populated
    ///
    /// Returns `true` when this call performed the population. On failure the
    /// cache stays empty and the error is returned.
    pub async fn ensure_loaded<F, Fut>(&self, fetch: F) -> Result<bool>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<Genre>, Vec<Genre>)>>,
    {
        if self.is_loaded() {
            return Ok(false);
        }

        let _guard = self.load_guard.lock().await;
        if self.is_loaded() {
            return Ok(false);
        }

        let (movie, tv) = fetch().await?;
        self.store(merge_genres(movie, tv));
        Ok(true)
    }

    /// Re-fetch and replace the cache contents
    ///
    /// The previous contents stay in place if the fetch fails.
    pub async fn refresh<F, Fut>(&self, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<Genre>, Vec<Genre>)>>,
    {
        let _guard = self.load_guard.lock().await;
        let (movie, tv) = fetch().await?;
        self.store(merge_genres(movie, tv));
        Ok(())
    }

    fn store(&self, genres: Vec<Genre>) {
        info!(count = genres.len(), "genre cache populated");
        *self.genres.write().unwrap_or_else(PoisonError::into_inner) = Some(genres);
    }
}

/// Union of the two taxonomies, de-duplicated by id; the first occurrence wins
pub fn merge_genres(movie: Vec<Genre>, tv: Vec<Genre>) -> Vec<Genre> {
    let mut merged: Vec<Genre> = Vec::with_capacity(movie.len() + tv.len());
    for genre in movie.into_iter().chain(tv) {
        if !merged.iter().any(|g| g.id == genre.id) {
            merged.push(genre);
        }
    }
    merged
}

impl TmdbClient {
    /// Load the genre cache once; later calls are no-ops
    pub async fn ensure_genres_loaded(&self) -> Result<()> {
        let populated = self
            .genres
            .ensure_loaded(|| self.fetch_genre_lists())
            .await?;
        if populated {
            debug!(count = self.genres.len(), "genres loaded");
        }
        Ok(())
    }

    /// Re-fetch both genre lists and replace the cache
    pub async fn refresh_genres(&self) -> Result<()> {
        self.genres.refresh(|| self.fetch_genre_lists()).await
    }

    /// Resolve a genre name to its id, loading the cache first if needed
    pub async fn genre_id(&self, name: &str) -> Result<u32> {
        self.ensure_genres_loaded().await?;
        self.genres
            .find_id(name)
            .ok_or_else(|| TmdbError::InvalidResponse(format!("unknown genre: {}", name)))
    }

    /// Movie and TV genre lists, fetched concurrently; both must succeed
    async fn fetch_genre_lists(&self) -> Result<(Vec<Genre>, Vec<Genre>)> {
        let params = QueryParams::new();
        let (movie, tv) = tokio::try_join!(
            self.fetch_json::<GenreList>("/genre/movie/list", &params),
            self.fetch_json::<GenreList>("/genre/tv/list", &params),
        )?;
        Ok((movie.genres, tv.genres))
    }
}
