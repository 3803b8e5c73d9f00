//! Logo enrichment
//!
//! Movies and series use different selection policies:
//!
//! - **Series**: try `en`, then `null` (no language restriction), then the
//!   empty string. The first attempt that returns any logo wins; within it,
//!   non-SVG logos are preferred and the highest vote average is picked
//!   (first one on ties). Failed attempts are skipped, and running out of
//!   attempts yields no logo.
//! - **Movies**: one `en` request; if it has no logos, one request with a broad
//!   language list. The first logo of the answering response is used as-is.
//!
//! Artwork is fetched fresh on every call.

use tracing::{debug, warn};

use super::query::QueryParams;
use super::tmdb::{Result, TmdbClient};
use super::wire::ImagesResponse;
use crate::models::{ContentKind, ImageAsset, UnifiedContent};

/// Language attempts for series logos, in order
pub const SERIES_LOGO_LANGUAGES: &[&str] = &["en", "null", ""];

/// First language tried for movie logos
pub const MOVIE_LOGO_LANGUAGE: &str = "en";

/// Second, broad language list for movie logos
pub const MOVIE_LOGO_FALLBACK_LANGUAGES: &str = "en,null,fr,de,es,pt,it,ru,ja,ko,zh";

/// Best logo among one language attempt's results
///
/// Non-SVG logos win over SVG ones; among the preferred set the highest
/// `vote_average` wins, earliest first on ties.
pub fn pick_best_logo(logos: &[ImageAsset]) -> Option<&ImageAsset> {
    let raster: Vec<&ImageAsset> = logos.iter().filter(|l| !l.is_svg()).collect();
    let pool: Vec<&ImageAsset> = if raster.is_empty() {
        logos.iter().collect()
    } else {
        raster
    };

    pool.into_iter().fold(None, |best, logo| match best {
        Some(current) if current.vote_average >= logo.vote_average => Some(current),
        _ => Some(logo),
    })
}

impl TmdbClient {
    /// Artwork for one title restricted to `languages`
    pub async fn images(
        &self,
        id: u64,
        kind: ContentKind,
        languages: &str,
    ) -> Result<ImagesResponse> {
        let path = format!("/{}/{}/images", kind.api_segment(), id);
        let params = QueryParams::new().with("include_image_language", languages);
        self.fetch_json(&path, &params).await
    }

    /// Logo for a series; never fails
    pub async fn series_logo(&self, id: u64) -> Option<String> {
        for &language in SERIES_LOGO_LANGUAGES {
            let images = match self.images(id, ContentKind::Series, language).await {
                Ok(images) => images,
                Err(e) => {
                    debug!(id, language, error = %e, "series logo attempt failed");
                    continue;
                }
            };

            if let Some(best) = pick_best_logo(&images.logos) {
                debug!(
                    id,
                    language,
                    candidates = images.logos.len(),
                    path = %best.file_path,
                    vote = best.vote_average,
                    "series logo selected"
                );
                return Some(best.file_path.clone());
            }
        }

        debug!(id, "no series logo in any language");
        None
    }

    /// Logo for a movie
    pub async fn movie_logo(&self, id: u64) -> Result<Option<String>> {
        let english = self
            .images(id, ContentKind::Movie, MOVIE_LOGO_LANGUAGE)
            .await?;
        if let Some(logo) = english.logos.first() {
            return Ok(Some(logo.file_path.clone()));
        }

        let any = self
            .images(id, ContentKind::Movie, MOVIE_LOGO_FALLBACK_LANGUAGES)
            .await?;
        Ok(any.logos.first().map(|l| l.file_path.clone()))
    }

    /// Logo for any kind, using that kind's policy
    pub async fn best_logo(&self, id: u64, kind: ContentKind) -> Result<Option<String>> {
        match kind {
            ContentKind::Movie => self.movie_logo(id).await,
            ContentKind::Series | ContentKind::Live => Ok(self.series_logo(id).await),
        }
    }

    /// Attach a logo to `item`; on failure the item comes back unchanged
    pub async fn enrich(&self, item: UnifiedContent) -> UnifiedContent {
        match self.best_logo(item.id, item.kind).await {
            Ok(logo) => item.with_logo(logo),
            Err(e) => {
                warn!(id = item.id, kind = %item.kind, error = %e, "logo lookup failed");
                item
            }
        }
    }

    /// Enrich items one at a time, preserving order
    pub async fn enrich_all(&self, items: Vec<UnifiedContent>) -> Vec<UnifiedContent> {
        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            enriched.push(self.enrich(item).await);
        }
        enriched
    }
}
