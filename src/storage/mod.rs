//! Export of generated schedules to the filesystem
//!
//! - [`csv`] - Semicolon-separated rows
//! - [`markdown`] - Printable timesheet via Handlebars
//!
//! JSON export serializes the full [`MonthlySchedule`] with serde_json.
//! Files of one month share the base name `Stundenzettel_{year}_{MM}`.

pub mod csv;
pub mod markdown;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use markdown::MarkdownWriter;

use crate::error::{Error, Result};
use crate::models::MonthlySchedule;

/// File formats written per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn all() -> Vec<Self> {
        vec![Self::Csv, Self::Markdown, Self::Json]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown export format '{other}' (expected csv, markdown, json)"),
        }
    }
}

/// `Stundenzettel_{year}_{MM}`
pub fn file_base(year: i32, month: u32) -> String {
    format!("Stundenzettel_{year}_{month:02}")
}

/// Writes monthly schedules into one output directory
pub struct TimesheetStorage<'a> {
    output_dir: PathBuf,
    formats: Vec<ExportFormat>,
    overwrite: bool,
    markdown: MarkdownWriter<'a>,
}

impl<'a> TimesheetStorage<'a> {
    /// Create storage, creating the output directory if needed
    pub fn new(
        output_dir: &Path,
        formats: Vec<ExportFormat>,
        overwrite: bool,
        signature: Option<String>,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir).map_err(|e| Error::storage(output_dir, e))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            formats,
            overwrite,
            markdown: MarkdownWriter::new(signature)?,
        })
    }

    /// Target path of one format for a month
    pub fn path_for(&self, year: i32, month: u32, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", file_base(year, month), format.extension()))
    }

    /// Target paths of all configured formats
    pub fn paths_for(&self, year: i32, month: u32) -> Vec<PathBuf> {
        self.formats
            .iter()
            .map(|f| self.path_for(year, month, *f))
            .collect()
    }

    /// Whether any target file of the month already exists
    pub fn exists(&self, year: i32, month: u32) -> bool {
        self.paths_for(year, month).iter().any(|p| p.exists())
    }

    /// Whether a month must be skipped to protect existing files
    pub fn should_skip(&self, year: i32, month: u32) -> bool {
        !self.overwrite && self.exists(year, month)
    }

    /// Write every configured format, returning the written paths
    pub fn save(&self, schedule: &MonthlySchedule) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let path = self.path_for(schedule.year, schedule.month, *format);
            match format {
                ExportFormat::Csv => self.save_csv(schedule, &path)?,
                ExportFormat::Markdown => self.save_markdown(schedule, &path)?,
                ExportFormat::Json => self.save_json(schedule, &path)?,
            }
            tracing::debug!(path = %path.display(), format = %format, "Saved timesheet");
            paths.push(path);
        }

        Ok(paths)
    }

    fn save_csv(&self, schedule: &MonthlySchedule, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::storage(path, e))?;

        csv::write_csv(BufWriter::new(file), &schedule.export_rows())
            .map_err(|e| Error::storage(path, e))
    }

    fn save_markdown(&self, schedule: &MonthlySchedule, path: &Path) -> Result<()> {
        let markdown = self.markdown.render(schedule)?;
        write_file(path, markdown.as_bytes())
    }

    fn save_json(&self, schedule: &MonthlySchedule, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(schedule)?;
        write_file(path, json.as_bytes())
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::storage(path, e))?;

    file.write_all(content).map_err(|e| Error::storage(path, e))
}
