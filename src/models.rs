//! Data structures shared by the client, the feeds and the pager
//!
//! Organized by domain:
//! - **Content**: the normalized display record and its kind
//! - **Genres**: genre pairs and the browse-by-genre shortcut table
//! - **Images**: artwork metadata and image URL resolution
//! - **Paging**: page results with known or unknown totals
//! - **Providers**: streaming services used as discover filters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// Content Models
// =============================================================================

/// Content kind, resolved once at normalization time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
    Live,
}

impl ContentKind {
    /// Path segment used by the upstream API (`movie` / `tv`)
    ///
    /// Live content has no upstream catalog; it maps to `tv` so that
    /// per-title lookups stay well-formed.
    pub fn api_segment(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series | ContentKind::Live => "tv",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Movie => write!(f, "Movie"),
            ContentKind::Series => write!(f, "Series"),
            ContentKind::Live => write!(f, "Live"),
        }
    }
}

/// Normalized display record
///
/// Identity is the upstream id: two records with the same id compare equal
/// even when their other fields differ, so an enriched copy of a title is
/// still "the same" title as its plain version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedContent {
    pub id: u64,
    pub title: String,
    pub subtitle: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub logo_path: Option<String>,
    pub kind: ContentKind,
    pub release_date: Option<String>,
}

impl UnifiedContent {
    /// Return a copy with the logo path replaced
    pub fn with_logo(mut self, logo_path: Option<String>) -> Self {
        self.logo_path = logo_path;
        self
    }

    /// Return a copy with the subtitle replaced
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Resolved poster URL at the given size
    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| image_url(p, size))
    }

    /// Resolved backdrop URL at the given size
    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        self.backdrop_path.as_deref().map(|p| image_url(p, size))
    }

    /// Resolved logo URL at the given size
    pub fn logo_url(&self, size: ImageSize) -> Option<String> {
        self.logo_path.as_deref().map(|p| image_url(p, size))
    }
}

impl PartialEq for UnifiedContent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UnifiedContent {}

impl Hash for UnifiedContent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for UnifiedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} [{}]", self.title, self.subtitle, self.kind)
    }
}

// =============================================================================
// Genre Models
// =============================================================================

/// Genre pair as returned by the genre list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

impl Genre {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Genre id used for the family row on the home screen
pub const FAMILY_GENRE_ID: u32 = 10751;

/// Browse-by-genre shortcuts shown on the home screen
pub const BROWSE_GENRES: &[(&str, u32)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", FAMILY_GENRE_ID),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("TV Movie", 10770),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
];

// =============================================================================
// Image Models
// =============================================================================

/// Image host for relative artwork paths
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Artwork metadata from the per-title images endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(default)]
    pub aspect_ratio: f64,
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
}

impl ImageAsset {
    pub fn is_svg(&self) -> bool {
        self.file_path.ends_with(".svg")
    }
}

/// Image size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 200px wide
    Small,
    /// 500px wide
    #[default]
    Medium,
    /// Full resolution
    Original,
}

impl ImageSize {
    pub fn segment(&self) -> &'static str {
        match self {
            ImageSize::Small => "w200",
            ImageSize::Medium => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Resolve a relative artwork path against the default image host
pub fn image_url(path: &str, size: ImageSize) -> String {
    image_url_with_base(IMAGE_BASE_URL, path, size)
}

/// Resolve a relative artwork path against a custom image host
pub fn image_url_with_base(base: &str, path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", base.trim_end_matches('/'), size.segment(), path)
}

// =============================================================================
// Paging Models
// =============================================================================

/// One page of results
///
/// `total_pages` is `None` when the upstream total is not trustworthy; in that
/// case paging continues for as long as pages keep coming back non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: Option<u32>,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: u32, total_pages: u32) -> Self {
        Self {
            items,
            page,
            total_pages: Some(total_pages),
        }
    }

    /// Page with an unknown total
    pub fn open_ended(items: Vec<T>, page: u32) -> Self {
        Self {
            items,
            page,
            total_pages: None,
        }
    }

    pub fn has_more(&self) -> bool {
        match self.total_pages {
            Some(total) => self.page < total,
            None => !self.items.is_empty(),
        }
    }
}

// =============================================================================
// Provider Models
// =============================================================================

/// Streaming provider used as a discover filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub id: u32,
    pub name: &'static str,
}

pub const NETFLIX: Provider = Provider { id: 8, name: "Netflix" };
pub const PRIME_VIDEO: Provider = Provider { id: 9, name: "Prime Video" };
pub const HULU: Provider = Provider { id: 15, name: "Hulu" };
pub const DISNEY_PLUS: Provider = Provider { id: 337, name: "Disney+" };
pub const APPLE_TV_PLUS: Provider = Provider { id: 350, name: "Apple TV+" };
pub const PEACOCK: Provider = Provider { id: 386, name: "Peacock" };
pub const PARAMOUNT_PLUS: Provider = Provider { id: 531, name: "Paramount+" };
pub const VIDEOLAND: Provider = Provider { id: 563, name: "Videoland" };
pub const MAX: Provider = Provider { id: 1899, name: "Max" };

/// Allow-list used by genre and recommendation discover queries
pub const MAJOR_PROVIDERS: &[Provider] =
    &[NETFLIX, DISNEY_PLUS, APPLE_TV_PLUS, PRIME_VIDEO, HULU, MAX];

/// `8|337|...` as expected by `with_watch_providers`
pub fn provider_filter(providers: &[Provider]) -> String {
    providers
        .iter()
        .map(|p| p.id.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// A "by provider" row on the Movies and Series screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderSection {
    pub provider: Provider,
    pub region: &'static str,
    pub page: u32,
}

const fn section(provider: Provider, region: &'static str, page: u32) -> ProviderSection {
    ProviderSection {
        provider,
        region,
        page,
    }
}

/// Provider rows, in display order, each with its own result page
pub const PROVIDER_SECTIONS: &[ProviderSection] = &[
    section(NETFLIX, "US", 1),
    section(HULU, "US", 2),
    section(PRIME_VIDEO, "US", 3),
    section(APPLE_TV_PLUS, "US", 4),
    section(PEACOCK, "US", 1),
    section(VIDEOLAND, "NL", 1),
    section(DISNEY_PLUS, "US", 2),
    section(PARAMOUNT_PLUS, "US", 1),
];

// =============================================================================
// Tests
// =============================================================================
