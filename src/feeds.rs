//! Composite screens
//!
//! Each feed loads everything one screen shows in a single call. A title
//! shown in a higher-priority row is left out of lower rows of the same
//! kind; priority runs popular > trending > upcoming > family. Movie and
//! series ids are separate namespaces and are de-duplicated separately.

use futures::future::try_join_all;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::api::catalog::TRENDING_LIMIT;
use crate::api::{TmdbClient, TmdbError};
use crate::models::{ContentKind, ProviderSection, UnifiedContent, BROWSE_GENRES, PROVIDER_SECTIONS};

/// Titles at the top of a trending list that become the popular row
pub const POPULAR_SPLIT: usize = 5;

/// Titles after the split that make up the trending row on the home screen
pub const HOME_TRENDING_ROW: usize = 15;

// =============================================================================
// De-duplication
// =============================================================================

/// Drop items whose id is in `seen`
pub fn exclude_seen(items: Vec<UnifiedContent>, seen: &HashSet<u64>) -> Vec<UnifiedContent> {
    items
        .into_iter()
        .filter(|item| !seen.contains(&item.id))
        .collect()
}

/// De-duplicate rows given in priority order
///
/// Each row loses the ids already listed by any row before it. The first row
/// is returned untouched, and whichever copy survives is the
/// higher-priority one.
pub fn dedupe_by_priority(rows: Vec<Vec<UnifiedContent>>) -> Vec<Vec<UnifiedContent>> {
    let mut seen: HashSet<u64> = HashSet::new();
    rows.into_iter()
        .map(|row| {
            let kept = exclude_seen(row, &seen);
            seen.extend(kept.iter().map(|item| item.id));
            kept
        })
        .collect()
}

fn split_popular(mut items: Vec<UnifiedContent>) -> (Vec<UnifiedContent>, Vec<UnifiedContent>) {
    let rest = items.split_off(POPULAR_SPLIT.min(items.len()));
    (items, rest)
}

fn take_rows<const N: usize>(rows: Vec<Vec<UnifiedContent>>) -> [Vec<UnifiedContent>; N] {
    let mut rows = rows.into_iter();
    std::array::from_fn(|_| rows.next().unwrap_or_default())
}

// =============================================================================
// Home
// =============================================================================

/// Everything on the Home tab
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeFeed {
    pub featured: Vec<UnifiedContent>,
    pub popular_movies: Vec<UnifiedContent>,
    pub trending_movies: Vec<UnifiedContent>,
    pub popular_series: Vec<UnifiedContent>,
    pub trending_series: Vec<UnifiedContent>,
    pub upcoming_movies: Vec<UnifiedContent>,
    pub upcoming_series: Vec<UnifiedContent>,
    pub family: Vec<UnifiedContent>,
}

impl HomeFeed {
    /// Load the home screen
    ///
    /// Genres load first; a failure there, or in any row fetch, fails the
    /// whole feed. Logo failures only leave individual titles without a logo.
    pub async fn load(client: &TmdbClient) -> Result<Self, TmdbError> {
        client.ensure_genres_loaded().await?;

        let (movies, series) = tokio::try_join!(
            client.trending(ContentKind::Movie, true, TRENDING_LIMIT),
            client.trending(ContentKind::Series, true, TRENDING_LIMIT),
        )?;
        let (popular_movies, mut trending_movies) = split_popular(movies);
        let (popular_series, mut trending_series) = split_popular(series);
        trending_movies.truncate(HOME_TRENDING_ROW);
        trending_series.truncate(HOME_TRENDING_ROW);

        let (featured, family, upcoming_movies, upcoming_series) = tokio::try_join!(
            client.featured(),
            client.family(),
            client.upcoming_movies(),
            client.upcoming_series(),
        )?;

        let [popular_movies, trending_movies, upcoming_movies, family] =
            take_rows::<4>(dedupe_by_priority(vec![
                popular_movies,
                trending_movies,
                upcoming_movies,
                family,
            ]));
        let [popular_series, trending_series, upcoming_series] = take_rows::<3>(dedupe_by_priority(
            vec![popular_series, trending_series, upcoming_series],
        ));

        let feed = Self {
            featured,
            popular_movies,
            trending_movies,
            popular_series,
            trending_series,
            upcoming_movies,
            upcoming_series,
            family,
        };
        info!(
            featured = feed.featured.len(),
            upcoming_movies = feed.upcoming_movies.len(),
            upcoming_series = feed.upcoming_series.len(),
            family = feed.family.len(),
            "home feed loaded"
        );
        Ok(feed)
    }
}

// =============================================================================
// Movies / Series tabs
// =============================================================================

/// One "by provider" row
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRow {
    pub section: ProviderSection,
    pub items: Vec<UnifiedContent>,
}

/// Everything on the Movies or Series tab
#[derive(Debug, Clone, Serialize)]
pub struct CatalogFeed {
    pub kind: ContentKind,
    pub popular: Vec<UnifiedContent>,
    pub trending: Vec<UnifiedContent>,
    pub upcoming: Vec<UnifiedContent>,
    pub providers: Vec<ProviderRow>,
}

impl CatalogFeed {
    /// Load the Movies or Series tab
    ///
    /// Trending titles with logos are split into the popular and trending
    /// rows; the upcoming row and every provider row are then fetched
    /// together.
    pub async fn load(client: &TmdbClient, kind: ContentKind) -> Result<Self, TmdbError> {
        client.ensure_genres_loaded().await?;

        let trending = client.trending(kind, true, TRENDING_LIMIT).await?;
        let (popular, trending) = split_popular(trending);

        let upcoming = async {
            match kind {
                ContentKind::Movie => client.upcoming_movies().await,
                ContentKind::Series | ContentKind::Live => client.upcoming_series().await,
            }
        };
        let providers = try_join_all(PROVIDER_SECTIONS.iter().map(|section| async move {
            let items = client
                .by_provider(kind, section.provider.id, section.region, section.page)
                .await?;
            Ok::<_, TmdbError>(ProviderRow {
                section: *section,
                items,
            })
        }));
        let (upcoming, providers) = tokio::try_join!(upcoming, providers)?;

        let [popular, trending, upcoming] =
            take_rows::<3>(dedupe_by_priority(vec![popular, trending, upcoming]));

        info!(
            %kind,
            upcoming = upcoming.len(),
            providers = providers.len(),
            "catalog feed loaded"
        );
        Ok(Self {
            kind,
            popular,
            trending,
            upcoming,
            providers,
        })
    }
}

// =============================================================================
// Genre filter
// =============================================================================

/// Home-screen rows for one selected genre
#[derive(Debug, Clone, Serialize)]
pub struct GenreFeed {
    pub genre_id: u32,
    pub genre_name: String,
    pub movies: Vec<UnifiedContent>,
    pub series: Vec<UnifiedContent>,
}

impl GenreFeed {
    pub async fn load(client: &TmdbClient, genre_id: u32) -> Result<Self, TmdbError> {
        client.ensure_genres_loaded().await?;

        let genre_name = client
            .genres()
            .resolve_name(genre_id)
            .or_else(|| {
                BROWSE_GENRES
                    .iter()
                    .find(|(_, id)| *id == genre_id)
                    .map(|(name, _)| name.to_string())
            })
            .unwrap_or_default();

        let (movies, series) = tokio::try_join!(
            client.by_genre(genre_id, ContentKind::Movie),
            client.by_genre(genre_id, ContentKind::Series),
        )?;

        Ok(Self {
            genre_id,
            genre_name,
            movies,
            series,
        })
    }
}
