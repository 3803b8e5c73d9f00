//! Content normalizer: raw TMDB records to display records

use super::genres::GenreCache;
use super::wire::RawContent;
use crate::models::{ContentKind, UnifiedContent};

/// Title used when a record has neither `title` nor `name`
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Subtitle used when none of a record's genre ids resolve
pub const NO_GENRES: &str = "No genres available";

impl RawContent {
    /// Kind by precedence: explicit `media_type`, then `title`, then `name`,
    /// then movie.
    pub fn kind(&self) -> ContentKind {
        match self.media_type.as_deref() {
            Some("tv") => ContentKind::Series,
            Some("movie") => ContentKind::Movie,
            _ if self.title.is_some() => ContentKind::Movie,
            _ if self.name.is_some() => ContentKind::Series,
            _ => ContentKind::Movie,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(UNKNOWN_TITLE)
    }

    /// Release date for movies, first air date for shows
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
    }
}

/// Up to `max` resolved genre names joined by ", "
pub fn genre_subtitle(ids: &[u32], genres: &GenreCache, max: usize) -> String {
    let names = genres.resolve_names(ids);
    if names.is_empty() {
        return NO_GENRES.to_string();
    }
    names
        .into_iter()
        .take(max.max(1))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize with the single-genre subtitle
pub fn normalize(raw: RawContent, genres: &GenreCache) -> UnifiedContent {
    normalize_with_genres(raw, genres, 1)
}

/// Normalize with a subtitle listing up to `max_genres` genre names
pub fn normalize_with_genres(
    raw: RawContent,
    genres: &GenreCache,
    max_genres: usize,
) -> UnifiedContent {
    let kind = raw.kind();
    let title = raw.display_title().to_string();
    let subtitle = genre_subtitle(&raw.genre_ids, genres, max_genres);
    let release_date = raw.date().map(str::to_string);

    UnifiedContent {
        id: raw.id,
        title,
        subtitle,
        poster_path: raw.poster_path,
        backdrop_path: raw.backdrop_path,
        logo_path: None,
        kind,
        release_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn raw(id: u64) -> RawContent {
        RawContent {
            id,
            ..RawContent::default()
        }
    }

    fn cache() -> GenreCache {
        GenreCache::preloaded(
            vec![Genre::new(28, "Action"), Genre::new(18, "Drama")],
            vec![Genre::new(10765, "Sci-Fi & Fantasy")],
        )
    }

    #[test]
    fn test_title_implies_movie() {
        let record = RawContent {
            title: Some("Heat".into()),
            ..raw(1)
        };
        assert_eq!(record.kind(), ContentKind::Movie);
    }

    #[test]
    fn test_name_implies_series() {
        let record = RawContent {
            name: Some("Severance".into()),
            ..raw(1)
        };
        assert_eq!(record.kind(), ContentKind::Series);
    }

    #[test]
    fn test_explicit_tag_beats_fields() {
        let tagged_tv = RawContent {
            title: Some("Odd record".into()),
            media_type: Some("tv".into()),
            ..raw(1)
        };
        assert_eq!(tagged_tv.kind(), ContentKind::Series);

        let tagged_movie = RawContent {
            name: Some("Odd record".into()),
            media_type: Some("movie".into()),
            ..raw(2)
        };
        assert_eq!(tagged_movie.kind(), ContentKind::Movie);
    }

    #[test]
    fn test_unrecognized_tag_falls_through() {
        let person = RawContent {
            name: Some("Someone".into()),
            media_type: Some("person".into()),
            ..raw(1)
        };
        assert_eq!(person.kind(), ContentKind::Series);
        assert_eq!(raw(2).kind(), ContentKind::Movie);
    }

    #[test]
    fn test_display_title_fallbacks() {
        let both = RawContent {
            title: Some("Title".into()),
            name: Some("Name".into()),
            ..raw(1)
        };
        assert_eq!(both.display_title(), "Title");
        assert_eq!(raw(2).display_title(), UNKNOWN_TITLE);
    }

    #[test]
    fn test_subtitle_is_first_resolved_genre() {
        let record = RawContent {
            title: Some("Heat".into()),
            genre_ids: vec![999, 18, 28],
            ..raw(1)
        };
        let item = normalize(record, &cache());
        assert_eq!(item.subtitle, "Drama");
        assert!(item.logo_path.is_none());
    }

    #[test]
    fn test_subtitle_without_resolvable_genres() {
        let record = RawContent {
            genre_ids: vec![999],
            ..raw(1)
        };
        assert_eq!(normalize(record, &cache()).subtitle, NO_GENRES);
        assert_eq!(normalize(raw(2), &GenreCache::new()).subtitle, NO_GENRES);
    }

    #[test]
    fn test_multi_genre_subtitle() {
        let ids = [28, 18, 10765];
        assert_eq!(genre_subtitle(&ids, &cache(), 2), "Action, Drama");
        assert_eq!(
            genre_subtitle(&ids, &cache(), 3),
            "Action, Drama, Sci-Fi & Fantasy"
        );
    }

    #[test]
    fn test_normalize_carries_paths_and_date() {
        let record = RawContent {
            name: Some("Andor".into()),
            poster_path: Some("/a.jpg".into()),
            backdrop_path: Some("/b.jpg".into()),
            first_air_date: Some("2022-09-21".into()),
            ..raw(83867)
        };
        let item = normalize(record, &cache());
        assert_eq!(item.id, 83867);
        assert_eq!(item.kind, ContentKind::Series);
        assert_eq!(item.poster_path.as_deref(), Some("/a.jpg"));
        assert_eq!(item.backdrop_path.as_deref(), Some("/b.jpg"));
        assert_eq!(item.release_date.as_deref(), Some("2022-09-21"));
    }
}
