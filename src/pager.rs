//! Incremental pagination for interactive search
//!
//! A [`SearchPager`] owns the state behind a scrolling result list: the
//! current query, the last page loaded, the known page total and the items
//! accumulated so far. Changing the query starts over at page 1; reaching the
//! end of the visible list loads the next page and appends it.
//!
//! Pages come from a [`PageSource`], so the same state machine drives plain
//! search and the open-ended recommended list.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{TmdbClient, TmdbError};
use crate::models::{ContentKind, PagedResult, UnifiedContent};

/// Pause before every page fetch
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(300);

/// How close to the end of the list a row has to be to trigger the next page
pub const NEAR_END_THRESHOLD: usize = 3;

/// Something that can produce one page of results for a query
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<PagedResult<UnifiedContent>, TmdbError>;
}

/// Search results for one kind; an empty query lists popular titles
#[derive(Clone)]
pub struct SearchSource {
    client: Arc<TmdbClient>,
    kind: ContentKind,
}

impl SearchSource {
    pub fn new(client: Arc<TmdbClient>, kind: ContentKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait]
impl PageSource for SearchSource {
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<PagedResult<UnifiedContent>, TmdbError> {
        self.client.search(self.kind, query, page).await
    }
}

/// Recommended titles for one kind; the query is ignored
#[derive(Clone)]
pub struct RecommendedSource {
    client: Arc<TmdbClient>,
    kind: ContentKind,
}

impl RecommendedSource {
    pub fn new(client: Arc<TmdbClient>, kind: ContentKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait]
impl PageSource for RecommendedSource {
    async fn fetch_page(
        &self,
        _query: &str,
        page: u32,
    ) -> Result<PagedResult<UnifiedContent>, TmdbError> {
        self.client.recommended(self.kind, page).await
    }
}

/// Paging state for one result list
pub struct SearchPager<S> {
    source: S,
    delay: Duration,
    query: String,
    page: u32,
    total_pages: Option<u32>,
    items: Vec<UnifiedContent>,
    is_loading_more: bool,
    has_more: bool,
}

impl<S: PageSource> SearchPager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            delay: DEFAULT_FETCH_DELAY,
            query: String::new(),
            page: 1,
            total_pages: None,
            items: Vec::new(),
            is_loading_more: false,
            has_more: false,
        }
    }

    /// Replace the pause taken before each fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Last page loaded
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn items(&self) -> &[UnifiedContent] {
        &self.items
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start over with a new query
    ///
    /// Paging goes back to page 1 and the list is emptied right away, before
    /// any fetch for the new query is issued.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
        self.total_pages = None;
        self.items.clear();
        self.is_loading_more = false;
        self.has_more = false;
    }

    /// Load page 1 of the current query, replacing the list
    pub async fn load_first_page(&mut self) -> Result<(), TmdbError> {
        self.pause().await;
        let result = self.source.fetch_page(&self.query, 1).await?;

        debug!(
            query = %self.query,
            total_pages = ?result.total_pages,
            count = result.items.len(),
            "first page loaded"
        );
        self.page = 1;
        self.total_pages = result.total_pages;
        self.has_more = result.has_more();
        self.items = result.items;
        Ok(())
    }

    /// Reset to `query` and load its first page
    pub async fn search(&mut self, query: impl Into<String>) -> Result<(), TmdbError> {
        self.set_query(query);
        self.load_first_page().await
    }

    /// Load and append the next page
    ///
    /// Returns whether a page was appended. Does nothing and returns
    /// `Ok(false)` when there is nothing more to load or a load is already in
    /// flight. An empty page from an open-ended source ends the list without
    /// counting as loaded. On failure the page counter goes back to where it
    /// was and the loaded items stay as they are.
    pub async fn near_end(&mut self) -> Result<bool, TmdbError> {
        if !self.has_more || self.is_loading_more {
            return Ok(false);
        }

        self.is_loading_more = true;
        self.page += 1;
        self.pause().await;

        let fetched = self.source.fetch_page(&self.query, self.page).await;
        self.is_loading_more = false;

        match fetched {
            Ok(result) if result.items.is_empty() && result.total_pages.is_none() => {
                debug!(query = %self.query, page = self.page, "open-ended list ended");
                self.page -= 1;
                self.has_more = false;
                Ok(false)
            }
            Ok(result) => {
                debug!(
                    query = %self.query,
                    page = self.page,
                    count = result.items.len(),
                    "next page appended"
                );
                if result.total_pages.is_some() {
                    self.total_pages = result.total_pages;
                }
                self.has_more = result.has_more();
                self.items.extend(result.items);
                Ok(true)
            }
            Err(e) => {
                warn!(query = %self.query, page = self.page, error = %e, "next page failed");
                self.page -= 1;
                Err(e)
            }
        }
    }

    /// Signal that the row at `index` became visible
    ///
    /// Loads the next page once the row is within [`NEAR_END_THRESHOLD`] of
    /// the end of the list.
    pub async fn item_appeared(&mut self, index: usize) -> Result<bool, TmdbError> {
        if index + NEAR_END_THRESHOLD < self.items.len() {
            return Ok(false);
        }
        self.near_end().await
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
