//! Month processing
//!
//! Wraps the generator with the month-level retry, the terminal preview and
//! the hand-off to [`TimesheetStorage`]. In bulk mode all twelve months of a
//! year are processed one after another; a month that cannot be generated
//! is reported and skipped without stopping the others.

use rand::Rng;
use std::path::PathBuf;

use crate::calendar::HolidaySet;
use crate::error::{Error, Result, TimesheetErrorTrait};
use crate::generator::ScheduleGenerator;
use crate::models::{month_label, ExportRow, MonthlySchedule};
use crate::storage::TimesheetStorage;
use crate::utils::retry::{with_retry, RetryConfig};

/// Result of processing one month
#[derive(Debug)]
pub enum MonthOutcome {
    /// Files written for the month
    Written {
        schedule: MonthlySchedule,
        paths: Vec<PathBuf>,
    },
    /// Existing files were kept
    Skipped { reason: String },
    /// Generation or export failed
    Failed(Error),
}

impl MonthOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Summary of a bulk run
#[derive(Debug, Default)]
pub struct BulkReport {
    pub year: i32,
    pub written: Vec<(u32, Vec<PathBuf>)>,
    pub skipped: Vec<(u32, String)>,
    pub failed: Vec<(u32, String)>,
}

impl BulkReport {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// Record one month's outcome
    pub fn record(&mut self, month: u32, outcome: MonthOutcome) {
        match outcome {
            MonthOutcome::Written { paths, .. } => self.written.push((month, paths)),
            MonthOutcome::Skipped { reason } => self.skipped.push((month, reason)),
            MonthOutcome::Failed(err) => self.failed.push((month, err.to_string())),
        }
    }

    /// `YYYY.MM` labels of failed months
    pub fn failed_labels(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|(month, _)| month_label(self.year, *month))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Terminal preview of a generated month
pub fn render_preview(schedule: &MonthlySchedule) -> String {
    let [date, start, end, total] = ExportRow::HEADERS;
    let mut out = format!(
        "Generated time sheet for {}-{:02}:\n{:<12} {:<8} {:<8} {:<6}\n",
        schedule.year, schedule.month, date, start, end, total
    );
    for row in schedule.export_rows() {
        out.push_str(&row.to_string());
        out.push('\n');
    }
    out.push_str(&format!(
        "\nTotal hours in the month: {}\n",
        schedule.total_display()
    ));
    out
}

/// Generates months and hands them to storage
pub struct MonthProcessor<'a, R: Rng> {
    generator: ScheduleGenerator,
    storage: TimesheetStorage<'a>,
    retry: RetryConfig,
    preview: bool,
    rng: R,
}

impl<'a, R: Rng> MonthProcessor<'a, R> {
    pub fn new(generator: ScheduleGenerator, storage: TimesheetStorage<'a>, rng: R) -> Self {
        Self {
            generator,
            storage,
            retry: RetryConfig::default(),
            preview: false,
            rng,
        }
    }

    /// Generations per month before giving up
    pub fn with_month_retries(mut self, retries: u32) -> Self {
        self.retry = RetryConfig::new(retries);
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn storage(&self) -> &TimesheetStorage<'a> {
        &self.storage
    }

    /// Generate a month with the month-level retry
    ///
    /// Configuration errors fail immediately; only an exhausted attempt
    /// budget triggers a fresh generation.
    pub fn generate_month(
        &mut self,
        year: i32,
        month: u32,
        holidays: &HolidaySet,
    ) -> Result<MonthlySchedule> {
        let generator = &self.generator;
        let rng = &mut self.rng;

        with_retry(&self.retry, |attempt| {
            if attempt > 1 {
                tracing::info!(year = year, month = month, attempt = attempt, "Retrying month");
            }
            generator
                .generate_with_holidays(&mut *rng, year, month, holidays)
                .map_err(Error::from)
        })
    }

    /// Process one month of `year`
    pub fn process_month(&mut self, year: i32, month: u32) -> MonthOutcome {
        match self.generator.holidays(year) {
            Ok(holidays) => self.process_month_with_holidays(year, month, &holidays),
            Err(e) => MonthOutcome::Failed(e.into()),
        }
    }

    fn process_month_with_holidays(
        &mut self,
        year: i32,
        month: u32,
        holidays: &HolidaySet,
    ) -> MonthOutcome {
        if self.storage.should_skip(year, month) {
            tracing::info!(year = year, month = month, "Files already exist, skipping month");
            return MonthOutcome::Skipped {
                reason: format!("Files for {month:02} {year} already exist"),
            };
        }

        let schedule = match self.generate_month(year, month, holidays) {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::warn!(
                    year = year,
                    month = month,
                    category = e.category().label(),
                    error = %e,
                    "Unable to generate a valid time sheet, skipping month"
                );
                return MonthOutcome::Failed(e);
            }
        };

        tracing::info!(
            year = year,
            month = month,
            worked_days = schedule.worked_days(),
            dropped_days = schedule.dropped.len(),
            total_hours = schedule.total_hours,
            attempts = schedule.attempts,
            "Generated time sheet"
        );

        if self.preview {
            println!("\n{}", render_preview(&schedule));
        }

        match self.storage.save(&schedule) {
            Ok(paths) => {
                for path in &paths {
                    tracing::info!(path = %path.display(), "File created");
                }
                MonthOutcome::Written { schedule, paths }
            }
            Err(e) => {
                tracing::warn!(
                    year = year,
                    month = month,
                    category = e.category().label(),
                    error = %e,
                    "Unable to write time sheet"
                );
                MonthOutcome::Failed(e)
            }
        }
    }

    /// Process all months of `year`
    pub fn process_year(&mut self, year: i32) -> BulkReport {
        let mut report = BulkReport::new(year);

        let holidays = match self.generator.holidays(year) {
            Ok(holidays) => holidays,
            Err(e) => {
                let message = e.to_string();
                for month in 1..=12 {
                    report.failed.push((month, message.clone()));
                }
                return report;
            }
        };

        for month in 1..=12 {
            let outcome = self.process_month_with_holidays(year, month, &holidays);
            report.record(month, outcome);
        }

        tracing::info!(
            year = year,
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Bulk processing completed"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HourRange, TimeWindow, WorkdayCountRange};
    use crate::storage::ExportFormat;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::TempDir;

    fn processor<'a>(
        dir: &TempDir,
        workdays: (u32, u32),
        hours: (f64, f64),
    ) -> MonthProcessor<'a, ChaCha8Rng> {
        let generator = ScheduleGenerator::new(
            WorkdayCountRange::new(workdays.0, workdays.1).unwrap(),
            TimeWindow::default(),
            HourRange::new(hours.0, hours.1).unwrap(),
        )
        .unwrap();
        let storage =
            TimesheetStorage::new(dir.path(), vec![ExportFormat::Csv], false, None).unwrap();
        MonthProcessor::new(generator, storage, ChaCha8Rng::seed_from_u64(5))
    }

    #[test]
    fn test_process_month_writes_files() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, (8, 8), (15.0, 17.0));

        let outcome = processor.process_month(2024, 2);
        match outcome {
            MonthOutcome::Written { schedule, paths } => {
                assert_eq!(schedule.rows.len(), 29);
                assert_eq!(paths, vec![dir.path().join("Stundenzettel_2024_02.csv")]);
                assert!(paths[0].exists());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_process_month_skips_existing() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, (8, 8), (0.0, 17.0));

        assert!(processor.process_month(2024, 3).is_written());
        assert!(matches!(
            processor.process_month(2024, 3),
            MonthOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_unreachable_minimum_fails_after_retries() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, (6, 8), (100.0, 120.0)).with_month_retries(2);
        processor.generator = ScheduleGenerator::new(
            WorkdayCountRange::new(6, 8).unwrap(),
            TimeWindow::default(),
            HourRange::new(100.0, 120.0).unwrap(),
        )
        .unwrap()
        .with_max_attempts(20);

        match processor.process_month(2024, 2) {
            MonthOutcome::Failed(Error::Generator(e)) => assert!(e.is_recoverable()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!processor.storage().exists(2024, 2));
    }

    #[test]
    fn test_process_year_reports_failures() {
        let dir = TempDir::new().unwrap();
        // May 2024 has only 19 eligible days in NRW
        let mut processor = processor(&dir, (20, 20), (0.0, 100.0));

        let report = processor.process_year(2024);
        assert_eq!(report.total(), 12);
        assert!(report.has_failures());
        assert!(report.failed_labels().contains(&"2024.05".to_string()));
        assert!(report.written.iter().any(|(month, _)| *month == 1));
    }

    #[test]
    fn test_render_preview() {
        let dir = TempDir::new().unwrap();
        let mut processor = processor(&dir, (8, 8), (0.0, 17.0));
        let holidays = processor.generator.holidays(2024).unwrap();
        let schedule = processor.generate_month(2024, 2, &holidays).unwrap();

        let preview = render_preview(&schedule);
        assert!(preview.starts_with("Generated time sheet for 2024-02:"));
        assert!(preview.contains("DATE"));
        assert!(preview.contains("29.02.2024"));
        assert!(preview.contains(&format!("Total hours in the month: {}", schedule.total_display())));
        assert_eq!(preview.lines().count(), 2 + 29 + 2);
    }
}
