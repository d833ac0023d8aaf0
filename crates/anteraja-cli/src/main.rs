mod etl;
mod report;

use std::path::{Path, PathBuf};

use anteraja_core::{AppConfig, ConfigError};
use anteraja_sentiment::Dictionary;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "anteraja")]
#[command(about = "Anteraja sentiment ETL: Twitter and Google Play to CSV and Azure Blob")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, translate, score and export one or both sources
    Run {
        /// Which source to process
        #[arg(long, value_enum, default_value_t = SourceArg::All)]
        source: SourceArg,

        /// Write local CSVs only, even when Azure credentials are configured
        #[arg(long)]
        no_upload: bool,

        /// Print the resolved plan without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the cleaned form of an English text
    Clean { text: String },
    /// Print the polarity score and label of an English text
    Score { text: String },
    /// Render charts from a previously exported CSV
    Report { csv_path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Twitter,
    PlayStore,
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = anteraja_core::load_app_config();
    let log_level = config.as_ref().map_or("info", |c| c.log_level.as_str());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run {
            source,
            no_upload,
            dry_run,
        }) => etl::run_etl(&config?, source, no_upload, dry_run).await?,
        Some(Commands::Clean { text }) => {
            let dictionary = load_dictionary(dictionary_path(&config))?;
            println!("{}", anteraja_sentiment::normalize_with(&text, &dictionary));
        }
        Some(Commands::Score { text }) => {
            let dictionary = load_dictionary(dictionary_path(&config))?;
            let cleaned = anteraja_sentiment::normalize_with(&text, &dictionary);
            let score = anteraja_sentiment::score(&cleaned);
            println!(
                "{score:+.4}\t{}\t{cleaned}",
                anteraja_sentiment::classify(score)
            );
        }
        Some(Commands::Report { csv_path }) => report::run_report(&csv_path)?,
        None => println!("anteraja: pass a subcommand, or --help for usage"),
    }

    Ok(())
}

/// Dictionary override for the offline commands.
///
/// Only `run` needs a valid configuration; the offline commands fall back to
/// the bundled word list when it does not resolve.
fn dictionary_path(config: &Result<AppConfig, ConfigError>) -> Option<&Path> {
    match config {
        Ok(config) => config.dictionary_path.as_deref(),
        Err(e) => {
            tracing::warn!(error = %e, "invalid configuration; using the bundled dictionary");
            None
        }
    }
}

/// The configured word list, or the bundled one when none is set.
fn load_dictionary(path: Option<&Path>) -> anyhow::Result<Dictionary> {
    match path {
        Some(path) => Ok(Dictionary::from_file(path)?),
        None => Ok(Dictionary::bundled().clone()),
    }
}
