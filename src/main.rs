//! Huuqo - streaming discovery from the command line
//!
//! # Usage
//!
//! ```bash
//! huuqo home
//! huuqo search "blade runner" --pages 2
//! huuqo provider 8 --kind series --json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use huuqo::cli::{Cli, Command, ExitCode, Output};
use huuqo::commands;
use huuqo::config::Config;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing();

    run_cli(cli).await.into()
}

/// Log to stderr so stdout stays machine-readable
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    // set-key creates the file, so it may not exist yet
    let config = match (&cli.command, cli.config.as_deref()) {
        (Command::SetKey(_), _) => Config::default(),
        (_, Some(path)) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        },
        (_, None) => Config::load(),
    };

    match cli.command {
        Command::Home => commands::home_cmd(&config, &output).await,

        Command::Catalog(cmd) => commands::catalog_cmd(cmd, &config, &output).await,

        Command::Trending(cmd) => commands::trending_cmd(cmd, &config, &output).await,

        Command::Popular(cmd) => commands::popular_cmd(cmd, &config, &output).await,

        Command::Upcoming(cmd) => commands::upcoming_cmd(cmd, &config, &output).await,

        Command::Provider(cmd) => commands::provider_cmd(cmd, &config, &output).await,

        Command::Genre(cmd) => commands::genre_cmd(cmd, &config, &output).await,

        Command::Featured => commands::featured_cmd(&config, &output).await,

        Command::Family => commands::family_cmd(&config, &output).await,

        Command::Search(cmd) => commands::search_cmd(cmd, &config, &output).await,

        Command::Recommended(cmd) => commands::recommended_cmd(cmd, &config, &output).await,

        Command::Certification(cmd) => commands::certification_cmd(cmd, &config, &output).await,

        Command::Logo(cmd) => commands::logo_cmd(cmd, &config, &output).await,

        Command::Genres => commands::genres_cmd(&config, &output).await,

        Command::SetKey(cmd) => commands::set_key_cmd(cmd, cli.config.as_deref(), &output),
    }
}
