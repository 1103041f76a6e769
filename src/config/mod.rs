//! Configuration management
//!
//! Generation bounds, output options and logging. Layers, lowest first:
//! defaults, environment variables, a TOML file. Command-line flags are
//! applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::generator::MAX_ATTEMPTS;
use crate::models::{parse_hhmm, HourRange, TimeWindow, WorkdayCountRange};
use crate::storage::ExportFormat;

/// Generations per month before the month is reported as failed
pub const MONTH_RETRIES: u32 = 3;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation bounds
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Export configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bounds and budgets for schedule generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Worked days per month
    #[serde(default)]
    pub workdays: WorkdayCountRange,

    /// Earliest start / latest end of a shift
    #[serde(default)]
    pub window: TimeWindow,

    /// Total hours per month
    #[serde(default)]
    pub hours: HourRange,

    /// Assembler attempts per generation
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Generations per month
    #[serde(default = "default_month_retries")]
    pub month_retries: u32,
}

fn default_max_attempts() -> u32 {
    MAX_ATTEMPTS
}

fn default_month_retries() -> u32 {
    MONTH_RETRIES
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            workdays: WorkdayCountRange::default(),
            window: TimeWindow::default(),
            hours: HourRange::default(),
            max_attempts: MAX_ATTEMPTS,
            month_retries: MONTH_RETRIES,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory; `Stundenzettel {year}` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Files written per month
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,

    /// Replace existing files instead of skipping the month
    #[serde(default)]
    pub overwrite: bool,

    /// Print each generated month to the terminal
    #[serde(default)]
    pub preview: bool,

    /// Name placed on the signature line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Csv, ExportFormat::Markdown]
}

impl OutputConfig {
    /// Directory for the files of `year`
    pub fn directory_for(&self, year: i32) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("Stundenzettel {year}")))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            formats: default_formats(),
            overwrite: false,
            preview: false,
            signature: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// Merge `overlay` into `base`, recursing into tables
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            toml::Value::Table(base)
        }
        (_, overlay) => overlay,
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        let generator = &mut config.generator;

        if let Some(min) = env_parse("STUNDENZETTEL_MIN_WORKDAYS") {
            generator.workdays.min = min;
        }
        if let Some(max) = env_parse("STUNDENZETTEL_MAX_WORKDAYS") {
            generator.workdays.max = max;
        }
        if let Ok(start) = std::env::var("STUNDENZETTEL_START_TIME") {
            generator.window.earliest =
                parse_hhmm(&start).context("Invalid STUNDENZETTEL_START_TIME")?;
        }
        if let Ok(end) = std::env::var("STUNDENZETTEL_END_TIME") {
            generator.window.latest = parse_hhmm(&end).context("Invalid STUNDENZETTEL_END_TIME")?;
        }
        if let Some(min) = env_parse("STUNDENZETTEL_MIN_HOURS") {
            generator.hours.min = min;
        }
        if let Some(max) = env_parse("STUNDENZETTEL_MAX_HOURS") {
            generator.hours.max = max;
        }

        config.output.directory = std::env::var("STUNDENZETTEL_OUTPUT_DIR").ok().map(PathBuf::from);
        config.output.signature = std::env::var("STUNDENZETTEL_SIGNATURE").ok();

        if let Ok(level) = std::env::var("STUNDENZETTEL_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("STUNDENZETTEL_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file on top of the environment
    ///
    /// Keys present in the file override `STUNDENZETTEL_*` variables; keys
    /// it leaves out keep the environment or default value.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_over(Self::from_env()?, path)
    }

    /// Load configuration from a file on top of `base`
    pub fn from_file_over(base: Self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let file: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;
        let base = toml::Value::try_from(base).context("Failed to serialize base configuration")?;

        let config: Self = merge_toml(base, file)
            .try_into()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let generator = &self.generator;

        generator.workdays.validate().context("Invalid workday range")?;
        generator.window.validate().context("Invalid time window")?;
        generator.hours.validate().context("Invalid hour range")?;

        if generator.workdays.max > 31 {
            anyhow::bail!("workdays.max must not exceed 31");
        }

        if generator.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        if generator.month_retries == 0 {
            anyhow::bail!("month_retries must be greater than 0");
        }

        if self.output.formats.is_empty() {
            anyhow::bail!("at least one output format is required");
        }

        if matches!(&self.output.signature, Some(s) if s.trim().is_empty()) {
            anyhow::bail!("signature must not be blank");
        }

        Ok(())
    }
}
