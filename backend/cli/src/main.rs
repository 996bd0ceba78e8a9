mod check_cmd;
mod terminal_output;
mod validate_cmd;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use catchup_config::{config_dir, config_file_path, load_and_prepare};

/// Upper bound for `validate --count`.
const MAX_PREVIEW_COUNT: u64 = 10_000;

#[derive(Parser)]
#[command(name = "catchup")]
#[command(about = "Compute the missed runs of a cron-scheduled job")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.catchup/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the unmet schedule times of a job descriptor
    Check {
        /// Job descriptor (JSON, or YAML for .yaml/.yml files)
        #[arg(short, long)]
        job: PathBuf,
        /// Evaluate as of this RFC 3339 instant; repeatable. Defaults to now.
        #[arg(long = "at", value_parser = parse_instant)]
        at: Vec<DateTime<Utc>>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate a schedule expression and show its next occurrences
    Validate {
        expression: String,
        /// Number of occurrences to show
        #[arg(
            short = 'n',
            long,
            default_value_t = 5,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_PREVIEW_COUNT)
        )]
        count: usize,
        /// Start from this RFC 3339 instant instead of now
        #[arg(long, value_parser = parse_instant)]
        after: Option<DateTime<Utc>>,
    },
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&config_path).await?;

    catchup_logging::init_logger(config.log_level(), config.log_dir().map(|p| p.as_path()));

    match cli.command {
        Commands::Check { job, at, json } => check_cmd::run(&config, &job, at, json).await,
        Commands::Validate {
            expression,
            count,
            after,
        } => validate_cmd::run(&config, &expression, count, after),
    }
}
