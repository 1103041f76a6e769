use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use stundenzettel::config::Config;
use stundenzettel::generator::ScheduleGenerator;
use stundenzettel::models::{month_label, parse_hhmm};
use stundenzettel::processor::{MonthOutcome, MonthProcessor};
use stundenzettel::storage::{ExportFormat, TimesheetStorage};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Calendar year (defaults to the current year)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(2000..=2100))]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12), conflicts_with = "bulk")]
    pub month: Option<u32>,

    /// Generate all twelve months of the year
    #[arg(long, default_value = "false")]
    pub bulk: bool,

    /// Minimum worked days per month
    #[arg(long)]
    pub min_workdays: Option<u32>,

    /// Maximum worked days per month
    #[arg(long)]
    pub max_workdays: Option<u32>,

    /// Earliest shift start (HH:MM)
    #[arg(long)]
    pub start: Option<String>,

    /// Latest shift end (HH:MM)
    #[arg(long)]
    pub end: Option<String>,

    /// Minimum total hours per month
    #[arg(long)]
    pub min_hours: Option<f64>,

    /// Maximum total hours per month
    #[arg(long)]
    pub max_hours: Option<f64>,

    /// Name placed on the signature line
    #[arg(long)]
    pub signature: Option<String>,

    /// Output directory (defaults to "Stundenzettel {year}")
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Export formats (csv, markdown, json)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// Replace existing files instead of skipping the month
    #[arg(long, default_value = "false")]
    pub overwrite: bool,

    /// Print each generated month
    #[arg(long, default_value = "false")]
    pub preview: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        let generator = &mut config.generator;

        if let Some(min) = self.min_workdays {
            generator.workdays.min = min;
        }
        if let Some(max) = self.max_workdays {
            generator.workdays.max = max;
        }
        if let Some(start) = &self.start {
            generator.window.earliest = parse_hhmm(start).context("Invalid --start")?;
        }
        if let Some(end) = &self.end {
            generator.window.latest = parse_hhmm(end).context("Invalid --end")?;
        }
        if let Some(min) = self.min_hours {
            generator.hours.min = min;
        }
        if let Some(max) = self.max_hours {
            generator.hours.max = max;
        }

        let output = &mut config.output;
        if let Some(signature) = &self.signature {
            output.signature = Some(signature.clone());
        }
        if let Some(dir) = &self.output_dir {
            output.directory = Some(dir.clone());
        }
        if !self.format.is_empty() {
            output.formats = self.format.clone();
        }
        output.overwrite |= self.overwrite;
        output.preview |= self.preview;

        Ok(())
    }
}

pub fn generate(args: GenerateArgs, mut config: Config) -> Result<()> {
    args.apply(&mut config)?;
    config.validate().context("Invalid configuration")?;

    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());

    let generator = ScheduleGenerator::from_config(&config.generator)?;
    let output_dir = config.output.directory_for(year);
    let storage = TimesheetStorage::new(
        &output_dir,
        config.output.formats.clone(),
        config.output.overwrite,
        config.output.signature.clone(),
    )?;

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut processor = MonthProcessor::new(generator, storage, rng)
        .with_month_retries(config.generator.month_retries)
        .with_preview(config.output.preview);

    if args.bulk {
        println!("Generating time sheets for {year}");
        println!("================================");

        let report = processor.process_year(year);

        for (_, paths) in &report.written {
            for path in paths {
                println!("File created: {}", path.display());
            }
        }
        for (month, reason) in &report.skipped {
            println!("Skipped {}: {reason}", month_label(year, *month));
        }

        println!(
            "\n{} written, {} skipped, {} failed",
            report.written.len(),
            report.skipped.len(),
            report.failed.len()
        );

        if report.has_failures() {
            println!("\nCan't create documents for:");
            for label in report.failed_labels() {
                println!("  {label}");
            }
        }

        return Ok(());
    }

    let month = args.month.unwrap_or_else(|| today.month());
    let label = month_label(year, month);

    match processor.process_month(year, month) {
        MonthOutcome::Written { schedule, paths } => {
            for path in &paths {
                println!("File created: {}", path.display());
            }
            println!(
                "{label}: {} worked days, {} hours",
                schedule.worked_days(),
                schedule.total_display()
            );
            if !schedule.dropped.is_empty() {
                println!(
                    "  {} selected day(s) dropped to stay within the maximum hours",
                    schedule.dropped.len()
                );
            }
        }
        MonthOutcome::Skipped { reason } => {
            println!("Skipped {label}: {reason}");
            println!("Use --overwrite to replace existing files.");
        }
        MonthOutcome::Failed(err) => {
            anyhow::bail!("Unable to generate a valid time sheet for {label}: {err}");
        }
    }

    Ok(())
}
