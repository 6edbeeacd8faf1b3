mod cli;
mod commands;
mod feed;
mod refresher;
mod report;
mod settings;
mod store;

use crate::cli::{Cli, Commands};
use crate::settings::Settings;
use clap::Parser;
use env_logger::{Builder, Env};
use log::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(&cli.config)?;
    debug!(
        "picks dir {}, {} teams, sweep {}",
        settings.picks_dir.display(),
        settings.aliases.len(),
        settings.match_config.exhaustive_fallback
    );

    match cli.command {
        Commands::Parse { input, json } => commands::parse(&settings, &input, json),
        Commands::Import { season, week, input } => {
            commands::import(&settings, season, week, &input)
        }
        Commands::Grade { season, week, json, watch } => {
            commands::grade(&settings, season, week, json, watch).await
        }
        Commands::Weeks { season } => commands::weeks(&settings, season),
    }
}

fn init_logging(verbose: u8) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = settings::log_level(verbose) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}
