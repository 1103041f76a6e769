use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::GenerateArgs;

#[derive(Parser)]
#[command(
    name = "stundenzettel",
    version,
    about = "Generates plausible monthly timesheets with CSV, Markdown and JSON export",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate timesheets for one month or a whole year
    Generate(GenerateArgs),

    /// List the public holidays and special days of a year
    Holidays {
        /// Calendar year
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(2000..=2100))]
        year: Option<i32>,

        /// Print as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!(config = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Generate(args) => {
            tracing::info!(
                year = ?args.year,
                month = ?args.month,
                bulk = %args.bulk,
                seed = ?args.seed,
                "Starting generate command"
            );
            commands::generate(args, config)?;
        }

        Commands::Holidays { year, json } => {
            tracing::info!(year = ?year, "Starting holidays command");
            commands::holidays(year, json)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("stundenzettel=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("stundenzettel={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stundenzettel=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
