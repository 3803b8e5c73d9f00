//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the loaded config and the Output, and
//! returns an ExitCode.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    CatalogCmd, ExitCode, GenreCmd, GenreRef, KindArg, Output, PagesOutput, PopularCmd,
    ProviderCmd, RecommendedCmd, SavedOutput, SearchCmd, SetKeyCmd, TitleCmd, TitleOutput,
    TrendingCmd,
};
use crate::config::Config;
use crate::feeds::{CatalogFeed, GenreFeed, HomeFeed};
use crate::models::{ContentKind, ImageSize, UnifiedContent};
use crate::pager::{PageSource, RecommendedSource, SearchPager, SearchSource};

// =============================================================================
// Helpers
// =============================================================================

/// Build a client from config, or report why we can't
fn connect(config: &Config, output: &Output) -> Result<Arc<TmdbClient>, ExitCode> {
    let api_key = config
        .api_key()
        .map_err(|e| output.error(e.to_string(), ExitCode::InvalidArgs))?;
    Ok(Arc::new(TmdbClient::with_options(
        api_key,
        config.client_options(),
    )))
}

fn fail(output: &Output, what: &str, err: &TmdbError) -> ExitCode {
    output.error(format!("{} failed: {}", what, err), ExitCode::from(err))
}

fn emit<T: Serialize>(output: &Output, data: T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

/// Genre names are only resolvable once the cache is loaded
async fn load_genres(client: &TmdbClient, output: &Output) -> Result<(), ExitCode> {
    client
        .ensure_genres_loaded()
        .await
        .map_err(|e| fail(output, "Genre list", &e))
}

async fn resolve_genre(client: &TmdbClient, raw: &str, output: &Output) -> Result<u32, ExitCode> {
    match GenreRef::parse(raw) {
        GenreRef::Id(id) => Ok(id),
        GenreRef::Name(name) => client.genre_id(&name).await.map_err(|e| {
            if client.genres().is_loaded() {
                output.error(format!("Unknown genre: {}", name), ExitCode::NotFound)
            } else {
                fail(output, "Genre list", &e)
            }
        }),
    }
}

/// Load up to `pages` pages from a pager, stopping early when the list ends
async fn collect_pages<S: PageSource>(
    pager: &mut SearchPager<S>,
    query: &str,
    pages: u32,
) -> Result<PagesOutput<UnifiedContent>, TmdbError> {
    pager.search(query).await?;
    for _ in 1..pages.max(1) {
        if !pager.near_end().await? {
            break;
        }
    }
    debug!(query, page = pager.page(), count = pager.items().len(), "pages collected");

    Ok(PagesOutput {
        items: pager.items().to_vec(),
        page: pager.page(),
        total_pages: pager.total_pages(),
        has_more: pager.has_more(),
    })
}

// =============================================================================
// Screens
// =============================================================================

pub async fn home_cmd(config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info("Loading home screen...");
    match HomeFeed::load(&client).await {
        Ok(feed) => emit(output, &feed),
        Err(e) => fail(output, "Home feed", &e),
    }
}

pub async fn catalog_cmd(cmd: CatalogCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let kind = ContentKind::from(cmd.tab);
    output.info(format!("Loading {} tab...", kind));
    match CatalogFeed::load(&client, kind).await {
        Ok(feed) => emit(output, &feed),
        Err(e) => fail(output, "Catalog feed", &e),
    }
}

// =============================================================================
// Lists
// =============================================================================

pub async fn trending_cmd(cmd: TrendingCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    let kind = ContentKind::from(cmd.kind);
    let result = match cmd.genre.as_deref() {
        Some(raw) => {
            let genre_id = match resolve_genre(&client, raw, output).await {
                Ok(id) => id,
                Err(code) => return code,
            };
            client.trending_by_genre(kind, genre_id, cmd.limit).await
        }
        None => client.trending(kind, !cmd.no_logos, cmd.limit).await,
    };

    match result {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Trending", &e),
    }
}

pub async fn popular_cmd(cmd: PopularCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    let kind = ContentKind::from(cmd.kind);
    let result = if cmd.logos {
        client.popular_with_logos(kind).await
    } else {
        client.popular(kind).await
    };

    match result {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Popular", &e),
    }
}

pub async fn upcoming_cmd(cmd: KindArg, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = match ContentKind::from(cmd.kind) {
        ContentKind::Movie => client.upcoming_movies().await,
        ContentKind::Series | ContentKind::Live => client.upcoming_series().await,
    };

    match result {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Upcoming", &e),
    }
}

pub async fn provider_cmd(cmd: ProviderCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    let region = cmd.region.unwrap_or_else(|| config.region.clone());
    let kind = ContentKind::from(cmd.kind);
    output.info(format!(
        "Provider {} in {} (page {})...",
        cmd.provider_id, region, cmd.page
    ));

    match client
        .by_provider(kind, cmd.provider_id, &region, cmd.page)
        .await
    {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Provider lookup", &e),
    }
}

pub async fn genre_cmd(cmd: GenreCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let genre_id = match resolve_genre(&client, &cmd.genre, output).await {
        Ok(id) => id,
        Err(code) => return code,
    };

    match cmd.kind.map(ContentKind::from) {
        None => match GenreFeed::load(&client, genre_id).await {
            Ok(feed) => emit(output, &feed),
            Err(e) => fail(output, "Genre feed", &e),
        },
        Some(kind) => {
            if let Err(code) = load_genres(&client, output).await {
                return code;
            }
            let result = if cmd.discover {
                client.discover_by_genre(kind, genre_id).await
            } else {
                client.by_genre(genre_id, kind).await
            };
            match result {
                Ok(items) => emit(output, &items),
                Err(e) => fail(output, "Genre lookup", &e),
            }
        }
    }
}

pub async fn featured_cmd(config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    match client.featured().await {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Featured", &e),
    }
}

pub async fn family_cmd(config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    match client.family().await {
        Ok(items) => emit(output, &items),
        Err(e) => fail(output, "Family", &e),
    }
}

// =============================================================================
// Paged Lists
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    if cmd.multi {
        output.info(format!("Searching movies and series for: {}", cmd.query));
        return match client.search_multi(&cmd.query).await {
            Ok(items) if items.is_empty() => {
                output.error(format!("No results for: {}", cmd.query), ExitCode::NotFound)
            }
            Ok(items) => emit(output, &items),
            Err(e) => fail(output, "Search", &e),
        };
    }

    if cmd.query.is_empty() {
        output.info("Empty query: listing popular titles");
    } else {
        output.info(format!("Searching for: {}", cmd.query));
    }

    let source = SearchSource::new(client, ContentKind::from(cmd.kind));
    let mut pager = SearchPager::new(source).with_delay(config.search_delay());
    match collect_pages(&mut pager, &cmd.query, cmd.pages).await {
        Ok(pages) if pages.items.is_empty() => {
            output.error(format!("No results for: {}", cmd.query), ExitCode::NotFound)
        }
        Ok(pages) => emit(output, &pages),
        Err(e) => fail(output, "Search", &e),
    }
}

pub async fn recommended_cmd(cmd: RecommendedCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    let source = RecommendedSource::new(client, ContentKind::from(cmd.kind));
    let mut pager = SearchPager::new(source).with_delay(config.search_delay());
    match collect_pages(&mut pager, "", cmd.pages).await {
        Ok(pages) => emit(output, &pages),
        Err(e) => fail(output, "Recommended", &e),
    }
}

// =============================================================================
// Single Titles
// =============================================================================

pub async fn certification_cmd(cmd: TitleCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let kind = ContentKind::from(cmd.kind);
    match client.certification(cmd.id, kind).await {
        Some(rating) => emit(
            output,
            TitleOutput {
                id: cmd.id,
                kind,
                value: Some(rating),
                url: None,
            },
        ),
        None => output.error(
            format!("No {} certification for {} {}", config.region, kind, cmd.id),
            ExitCode::NotFound,
        ),
    }
}

pub async fn logo_cmd(cmd: TitleCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let kind = ContentKind::from(cmd.kind);
    match client.best_logo(cmd.id, kind).await {
        Ok(Some(path)) => {
            let url = client.image_url(&path, ImageSize::Original);
            emit(
                output,
                TitleOutput {
                    id: cmd.id,
                    kind,
                    value: Some(path),
                    url: Some(url),
                },
            )
        }
        Ok(None) => output.error(format!("No logo for {} {}", kind, cmd.id), ExitCode::NotFound),
        Err(e) => fail(output, "Logo lookup", &e),
    }
}

pub async fn genres_cmd(config: &Config, output: &Output) -> ExitCode {
    let client = match connect(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(code) = load_genres(&client, output).await {
        return code;
    }

    emit(output, client.genres().snapshot())
}

// =============================================================================
// Config
// =============================================================================

/// Write the key into the config file at `path` (or the default location),
/// keeping any other settings already in that file
pub fn set_key_cmd(cmd: SetKeyCmd, path: Option<&Path>, output: &Output) -> ExitCode {
    let key = cmd.key.trim();
    if key.is_empty() {
        return output.error("API key cannot be empty", ExitCode::InvalidArgs);
    }
    let Some(path) = path.map(Path::to_path_buf).or_else(Config::path) else {
        return output.error("Could not determine config path", ExitCode::Error);
    };

    let mut config = if path.exists() {
        match Config::load_from(&path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        }
    } else {
        Config::default()
    };
    config.tmdb_api_key = Some(key.to_string());

    if let Err(e) = config.save_to(&path) {
        return output.error(format!("Could not write {}: {}", path.display(), e), ExitCode::Error);
    }
    emit(output, SavedOutput { path })
}
