//! Aggregation queries
//!
//! Each query builds one or more list requests, normalizes the records and,
//! for the `*_with_logos` family, enriches them one title at a time. Queries
//! that prefer a regional answer ask with `region` first and only repeat the
//! request unscoped when the regional list comes back empty; that is a
//! content fallback, not a retry on failure.

use chrono::{Local, Months, NaiveDate};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::normalize::{normalize, normalize_with_genres};
use super::query::QueryParams;
use super::tmdb::{Result, TmdbClient, TmdbError};
use super::wire::{ContentRatingsResponse, PageResponse, RawContent, ReleaseDatesResponse};
use crate::models::{
    provider_filter, ContentKind, PagedResult, UnifiedContent, FAMILY_GENRE_ID, MAJOR_PROVIDERS,
};

/// Default cap for trending rows
pub const TRENDING_LIMIT: usize = 20;

/// Cap for popular rows
pub const POPULAR_LIMIT: usize = 15;

/// Cap for genre rows
pub const GENRE_LIMIT: usize = 20;

/// Trending movies in the featured carousel
pub const FEATURED_MOVIES: usize = 3;

/// Trending series in the featured carousel
pub const FEATURED_SERIES: usize = 2;

/// Minimum vote count for recommendation rows
pub const RECOMMENDED_MIN_VOTES: u32 = 100;

/// How far ahead the upcoming-series window reaches
pub const UPCOMING_SERIES_MONTHS: u32 = 6;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Discover filters used by the "by provider" rows; movies and series differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPolicy {
    pub operator: &'static str,
    pub monetization: &'static str,
    pub min_votes: u32,
    /// Genre names listed in each subtitle
    pub subtitle_genres: usize,
}

impl ProviderPolicy {
    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Movie => Self {
                operator: "OR",
                monetization: "flatrate|free|ads",
                min_votes: 20,
                subtitle_genres: 3,
            },
            ContentKind::Series | ContentKind::Live => Self {
                operator: "AND",
                monetization: "flatrate",
                min_votes: 50,
                subtitle_genres: 1,
            },
        }
    }
}

/// Long display date, e.g. "March 7, 2025"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

impl TmdbClient {
    async fn fetch_page(&self, path: &str, params: QueryParams) -> Result<PageResponse> {
        self.fetch_json(path, &params).await
    }

    fn normalize_all(&self, records: Vec<RawContent>, limit: usize) -> Vec<UnifiedContent> {
        records
            .into_iter()
            .take(limit)
            .map(|raw| normalize(raw, &self.genres))
            .collect()
    }

    // =========================================================================
    // Trending
    // =========================================================================

    /// Today's trending titles, optionally enriched with logos
    pub async fn trending(
        &self,
        kind: ContentKind,
        with_logos: bool,
        limit: usize,
    ) -> Result<Vec<UnifiedContent>> {
        let path = format!("/trending/{}/day", kind.api_segment());
        let page = self.fetch_page(&path, self.localized().page(1)).await?;
        let items = self.normalize_all(page.results, limit);

        if with_logos {
            Ok(self.enrich_all(items).await)
        } else {
            Ok(items)
        }
    }

    /// Today's trending titles in one genre, the first `limit` enriched with logos
    pub async fn trending_by_genre(
        &self,
        kind: ContentKind,
        genre_id: u32,
        limit: usize,
    ) -> Result<Vec<UnifiedContent>> {
        let path = format!("/trending/{}/day", kind.api_segment());
        let params = self.localized().with("with_genres", genre_id).page(1);
        let page = self.fetch_page(&path, params).await?;
        let items = self.normalize_all(page.results, limit);
        Ok(self.enrich_all(items).await)
    }

    // =========================================================================
    // Popular
    // =========================================================================

    async fn popular_records(&self, kind: ContentKind) -> Result<Vec<RawContent>> {
        let path = format!("/{}/popular", kind.api_segment());

        let regional = self
            .fetch_page(
                &path,
                self.localized().with("region", &self.options().region).page(1),
            )
            .await?;
        if !regional.results.is_empty() {
            return Ok(regional.results);
        }

        debug!(%kind, "no regional popular titles, asking unscoped");
        let any = self.fetch_page(&path, self.localized().page(1)).await?;
        Ok(any.results)
    }

    /// Popular titles, regional first
    pub async fn popular(&self, kind: ContentKind) -> Result<Vec<UnifiedContent>> {
        let records = self.popular_records(kind).await?;
        Ok(self.normalize_all(records, POPULAR_LIMIT))
    }

    pub async fn popular_with_logos(&self, kind: ContentKind) -> Result<Vec<UnifiedContent>> {
        let items = self.popular(kind).await?;
        Ok(self.enrich_all(items).await)
    }

    // =========================================================================
    // Upcoming
    // =========================================================================

    pub async fn upcoming_movies(&self) -> Result<Vec<UnifiedContent>> {
        self.upcoming_movies_on(Local::now().date_naive()).await
    }

    /// Unreleased movies with a poster, soonest first
    pub async fn upcoming_movies_on(&self, today: NaiveDate) -> Result<Vec<UnifiedContent>> {
        let path = "/movie/upcoming";
        let regional = self
            .fetch_page(
                path,
                self.localized().with("region", &self.options().region),
            )
            .await?;
        let records = if regional.results.is_empty() {
            debug!("no regional upcoming movies, asking unscoped");
            self.fetch_page(path, self.localized()).await?.results
        } else {
            regional.results
        };

        let mut dated: Vec<(NaiveDate, UnifiedContent)> = records
            .into_iter()
            .filter_map(|raw| {
                let released = raw.release_date.as_deref().and_then(parse_date);
                match released {
                    Some(date) if raw.poster_path.is_some() && date >= today => {
                        let subtitle = if date == today {
                            "Available Today".to_string()
                        } else {
                            format!("Available soon\n{}", format_display_date(date))
                        };
                        Some((date, normalize(raw, &self.genres).with_subtitle(subtitle)))
                    }
                    _ => {
                        debug!(id = raw.id, "upcoming movie skipped");
                        None
                    }
                }
            })
            .collect();

        dated.sort_by_key(|(date, _)| *date);
        Ok(dated.into_iter().map(|(_, item)| item).collect())
    }

    pub async fn upcoming_series(&self) -> Result<Vec<UnifiedContent>> {
        self.upcoming_series_on(Local::now().date_naive()).await
    }

    /// Series premiering between today and six months out, in API order
    pub async fn upcoming_series_on(&self, today: NaiveDate) -> Result<Vec<UnifiedContent>> {
        let until = today
            .checked_add_months(Months::new(UPCOMING_SERIES_MONTHS))
            .ok_or_else(|| {
                TmdbError::InvalidResponse(format!("date window overflows from {}", today))
            })?;
        let start = today.format(DATE_FORMAT).to_string();
        let end = until.format(DATE_FORMAT).to_string();

        let params = self
            .localized()
            .sort_by("first_air_date.asc")
            .with("air_date.gte", &start)
            .with("air_date.lte", &end)
            .with("first_air_date.gte", &start);
        let page = self.fetch_page("/discover/tv", params).await?;

        let items: Vec<UnifiedContent> = page
            .results
            .into_iter()
            .filter_map(|raw| {
                let airs = raw.first_air_date.as_deref().and_then(parse_date);
                match airs {
                    Some(date) if raw.poster_path.is_some() => {
                        let subtitle = if date == today {
                            "Premiering Today".to_string()
                        } else {
                            format!("Premiering on\n{}", format_display_date(date))
                        };
                        Some(normalize(raw, &self.genres).with_subtitle(subtitle))
                    }
                    _ => {
                        debug!(id = raw.id, "upcoming series skipped");
                        None
                    }
                }
            })
            .collect();

        if items.is_empty() {
            warn!(%start, %end, "no upcoming series with posters");
        }
        Ok(items)
    }

    // =========================================================================
    // Discover
    // =========================================================================

    /// One page of a provider's catalog in a region, most popular first
    pub async fn by_provider(
        &self,
        kind: ContentKind,
        provider_id: u32,
        region: &str,
        page: u32,
    ) -> Result<Vec<UnifiedContent>> {
        let policy = ProviderPolicy::for_kind(kind);
        let path = format!("/discover/{}", kind.api_segment());
        let params = QueryParams::new()
            .with("with_watch_providers", provider_id)
            .with("watch_region", region)
            .with("with_watch_providers.operator", policy.operator)
            .sort_by("popularity.desc")
            .page(page)
            .with("with_watch_monetization_types", policy.monetization)
            .with("vote_count.gte", policy.min_votes)
            .with("language", &self.options().language);

        let response = self.fetch_page(&path, params).await?;
        debug!(provider_id, region, page, count = response.results.len(), "provider page");

        Ok(response
            .results
            .into_iter()
            .map(|raw| normalize_with_genres(raw, &self.genres, policy.subtitle_genres))
            .collect())
    }

    /// Popular titles in a genre, limited to the major streaming providers
    pub async fn by_genre(&self, genre_id: u32, kind: ContentKind) -> Result<Vec<UnifiedContent>> {
        let path = format!("/discover/{}", kind.api_segment());
        let params = self
            .localized()
            .sort_by("popularity.desc")
            .with("with_genres", genre_id)
            .with("watch_region", &self.options().region)
            .with("with_watch_providers", provider_filter(MAJOR_PROVIDERS))
            .with("with_watch_monetization_types", "flatrate");

        let page = self.fetch_page(&path, params).await?;
        Ok(self.normalize_all(page.results, GENRE_LIMIT))
    }

    /// Popular titles in a genre across all providers, enriched with logos
    pub async fn discover_by_genre(
        &self,
        kind: ContentKind,
        genre_id: u32,
    ) -> Result<Vec<UnifiedContent>> {
        let path = format!("/discover/{}", kind.api_segment());
        let params = self
            .localized()
            .sort_by("popularity.desc")
            .with("with_genres", genre_id)
            .page(1);

        let page = self.fetch_page(&path, params).await?;
        let items = self.normalize_all(page.results, GENRE_LIMIT);
        Ok(self.enrich_all(items).await)
    }

    /// Family movies, adult titles excluded
    pub async fn family(&self) -> Result<Vec<UnifiedContent>> {
        let params = QueryParams::new()
            .with("with_genres", FAMILY_GENRE_ID)
            .sort_by("popularity.desc")
            .with("include_adult", false);
        let page = self.fetch_page("/discover/movie", params).await?;
        Ok(self.normalize_all(page.results, usize::MAX))
    }

    /// Major-provider titles with at least [`RECOMMENDED_MIN_VOTES`] votes
    ///
    /// The upstream total for this query is not meaningful, so the result is
    /// open-ended: it has more pages for as long as pages are non-empty.
    pub async fn recommended(
        &self,
        kind: ContentKind,
        page: u32,
    ) -> Result<PagedResult<UnifiedContent>> {
        let path = format!("/discover/{}", kind.api_segment());
        let params = self
            .localized()
            .sort_by("popularity.desc")
            .with("watch_region", &self.options().region)
            .with("with_watch_providers", provider_filter(MAJOR_PROVIDERS))
            .with("with_watch_monetization_types", "flatrate")
            .with("vote_count.gte", RECOMMENDED_MIN_VOTES)
            .page(page);

        let response = self.fetch_page(&path, params).await?;
        let items = response
            .results
            .into_iter()
            .map(|raw| normalize_with_genres(raw, &self.genres, 2))
            .collect();
        Ok(PagedResult::open_ended(items, page))
    }

    // =========================================================================
    // Featured
    // =========================================================================

    /// Top trending movies and series with logos, in random order
    pub async fn featured(&self) -> Result<Vec<UnifiedContent>> {
        let (movies, series) = tokio::try_join!(
            self.fetch_page("/trending/movie/day", self.localized()),
            self.fetch_page("/trending/tv/day", self.localized()),
        )?;

        let mut items = self.normalize_all(movies.results, FEATURED_MOVIES);
        items.extend(self.normalize_all(series.results, FEATURED_SERIES));
        let mut items = self.enrich_all(items).await;

        items.shuffle(&mut rand::thread_rng());
        Ok(items)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// One page of search results; an empty query lists popular titles instead
    pub async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        page: u32,
    ) -> Result<PagedResult<UnifiedContent>> {
        let response = if query.is_empty() {
            let path = format!("/{}/popular", kind.api_segment());
            self.fetch_page(&path, self.localized().page(page)).await?
        } else {
            let path = format!("/search/{}", kind.api_segment());
            let params = self
                .localized()
                .with("query", query)
                .page(page)
                .with("include_adult", false);
            self.fetch_page(&path, params).await?
        };

        debug!(
            %kind,
            page,
            total_pages = response.total_pages,
            count = response.results.len(),
            "search page"
        );
        let total_pages = response.total_pages;
        let items = self.normalize_all(response.results, usize::MAX);
        Ok(PagedResult::new(items, page, total_pages))
    }

    /// Movies and series in one search; people are dropped
    pub async fn search_multi(&self, query: &str) -> Result<Vec<UnifiedContent>> {
        let params = self.localized().with("query", query).page(1);
        let page = self.fetch_page("/search/multi", params).await?;

        Ok(page
            .results
            .into_iter()
            .filter(|raw| matches!(raw.media_type.as_deref(), Some("movie") | Some("tv")))
            .map(|raw| normalize(raw, &self.genres))
            .collect())
    }

    // =========================================================================
    // Certification
    // =========================================================================

    /// Regional content rating; `None` on any failure
    pub async fn certification(&self, id: u64, kind: ContentKind) -> Option<String> {
        let region = self.options().region.as_str();
        let result = match kind {
            ContentKind::Movie => self.movie_certification(id, region).await,
            ContentKind::Series | ContentKind::Live => self.tv_rating(id, region).await,
        };

        match result {
            Ok(rating) => {
                if rating.is_none() {
                    debug!(id, %kind, region, "no certification for region");
                }
                rating
            }
            Err(e) => {
                warn!(id, %kind, error = %e, "certification lookup failed");
                None
            }
        }
    }

    async fn movie_certification(&self, id: u64, region: &str) -> Result<Option<String>> {
        let path = format!("/movie/{}/release_dates", id);
        let response: ReleaseDatesResponse = self.fetch_json(&path, &QueryParams::new()).await?;

        Ok(response
            .results
            .into_iter()
            .find(|r| r.country == region)
            .and_then(|r| {
                r.release_dates
                    .into_iter()
                    .map(|d| d.certification)
                    .find(|c| !c.is_empty())
            }))
    }

    async fn tv_rating(&self, id: u64, region: &str) -> Result<Option<String>> {
        let path = format!("/tv/{}/content_ratings", id);
        let response: ContentRatingsResponse =
            self.fetch_json(&path, &QueryParams::new()).await?;

        Ok(response
            .results
            .into_iter()
            .find(|r| r.country == region)
            .map(|r| r.rating)
            .filter(|r| !r.is_empty()))
    }
}
