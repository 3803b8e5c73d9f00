//! CLI - Command Line Interface for Huuqo
//!
//! Every catalog query is scriptable and all output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Rows of the home screen
//! huuqo home --json
//!
//! # Search, one page at a time
//! huuqo search "the batman" --kind movie --pages 2
//!
//! # What Netflix has in the Netherlands
//! huuqo provider 8 --kind series --region NL
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::TmdbError;
use crate::models::ContentKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Upstream request failed
    NetworkError = 3,
    /// Nothing matched
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&TmdbError> for ExitCode {
    fn from(err: &TmdbError) -> Self {
        match err {
            TmdbError::InvalidUrl(_) => ExitCode::InvalidArgs,
            TmdbError::InvalidResponse(_) | TmdbError::Decoding(_) => ExitCode::NetworkError,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Huuqo - streaming discovery from the command line
#[derive(Parser, Debug)]
#[command(
    name = "huuqo",
    version,
    about = "Browse what's trending, upcoming and streaming, backed by TMDB",
    long_about = "Browse what's trending, upcoming and streaming.\n\n\
                  Each subcommand runs one catalog query or one screen's worth \
                  of rows and prints the result.",
    after_help = "EXAMPLES:\n\
                  huuqo home                          Everything on the home screen\n\
                  huuqo trending -k series            Trending shows with logos\n\
                  huuqo search \"blade runner\"         Search movies\n\
                  huuqo provider 8 -k series -r NL    Netflix shows in the Netherlands"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Everything on the Home tab
    Home,

    /// Everything on the Movies or Series tab
    #[command(visible_alias = "tab")]
    Catalog(CatalogCmd),

    /// Today's trending titles
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Popular titles in the configured region
    #[command(visible_alias = "pop")]
    Popular(PopularCmd),

    /// Movies releasing or shows premiering soon
    #[command(visible_alias = "up")]
    Upcoming(KindArg),

    /// Titles available on one streaming provider
    #[command(visible_alias = "pr")]
    Provider(ProviderCmd),

    /// Titles in one genre on the major providers
    #[command(visible_alias = "g")]
    Genre(GenreCmd),

    /// Featured carousel
    Featured,

    /// Family movies
    Family,

    /// Search by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Recommended titles on the major providers
    #[command(visible_alias = "rec")]
    Recommended(RecommendedCmd),

    /// Regional content rating for one title
    #[command(visible_alias = "cert")]
    Certification(TitleCmd),

    /// Logo for one title
    Logo(TitleCmd),

    /// List all known genres
    Genres,

    /// Store a TMDB API key in the config file
    SetKey(SetKeyCmd),
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// Content kind as given on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    /// Movies
    #[default]
    Movie,
    /// TV series
    #[value(alias = "tv")]
    Series,
}

impl From<KindFilter> for ContentKind {
    fn from(kind: KindFilter) -> Self {
        match kind {
            KindFilter::Movie => ContentKind::Movie,
            KindFilter::Series => ContentKind::Series,
        }
    }
}

#[derive(Args, Debug)]
pub struct KindArg {
    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,
}

// =============================================================================
// Commands
// =============================================================================

/// Movies or Series tab
#[derive(Args, Debug)]
pub struct CatalogCmd {
    /// Which tab to load
    #[arg(value_enum)]
    pub tab: KindFilter,
}

/// Trending titles
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,

    /// Only titles in this genre (id or name)
    #[arg(long, short = 'g')]
    pub genre: Option<String>,

    /// Skip logo lookups
    #[arg(long)]
    pub no_logos: bool,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Popular titles
#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,

    /// Attach logos
    #[arg(long)]
    pub logos: bool,
}

/// Titles on one provider
#[derive(Args, Debug)]
pub struct ProviderCmd {
    /// Provider id (e.g. 8 for Netflix)
    #[arg(required = true)]
    pub provider_id: u32,

    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,

    /// Watch region (defaults to the configured region)
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Result page
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,
}

/// Titles in one genre
#[derive(Args, Debug)]
pub struct GenreCmd {
    /// Genre id or name
    #[arg(required = true)]
    pub genre: String,

    /// Content kind; omit for both movies and series
    #[arg(long, short = 'k', value_enum)]
    pub kind: Option<KindFilter>,

    /// Popularity-sorted discover with logos instead of the provider-scoped list
    #[arg(long)]
    pub discover: bool,
}

/// Search by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query; empty lists popular titles
    #[arg(default_value = "")]
    pub query: String,

    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,

    /// Search movies and series together
    #[arg(long, short = 'm', conflicts_with = "kind")]
    pub multi: bool,

    /// Number of pages to load
    #[arg(long, short = 'p', default_value = "1")]
    pub pages: u32,
}

/// Recommended titles
#[derive(Args, Debug)]
pub struct RecommendedCmd {
    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,

    /// Number of pages to load
    #[arg(long, short = 'p', default_value = "1")]
    pub pages: u32,
}

/// One title by TMDB id
#[derive(Args, Debug)]
pub struct TitleCmd {
    /// TMDB id
    #[arg(required = true)]
    pub id: u64,

    /// Content kind
    #[arg(long, short = 'k', value_enum, default_value = "movie")]
    pub kind: KindFilter,
}

#[derive(Args, Debug)]
pub struct SetKeyCmd {
    /// TMDB API key (v3)
    #[arg(required = true)]
    pub key: String,
}

/// A genre given either by id or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreRef {
    Id(u32),
    Name(String),
}

impl GenreRef {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u32>() {
            Ok(id) => GenreRef::Id(id),
            Err(_) => GenreRef::Name(raw.to_string()),
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Loaded pages of a paged list
#[derive(Debug, Serialize)]
pub struct PagesOutput<T: Serialize> {
    pub items: Vec<T>,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    pub has_more: bool,
}

/// Single-title lookup result
#[derive(Debug, Serialize)]
pub struct TitleOutput {
    pub id: u64,
    pub kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Where a config change was written
#[derive(Debug, Serialize)]
pub struct SavedOutput {
    pub path: PathBuf,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
