//! Core data structures and types
//!
//! Bounds that configure generation ([`WorkdayCountRange`], [`TimeWindow`],
//! [`HourRange`]) and the values it produces ([`ShiftRecord`], [`DayRow`],
//! [`MonthlySchedule`]). [`ExportRow`] is the four-column interchange shape
//! consumed by every export collaborator.

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::generator::error::{GeneratorError, GeneratorResult};

/// Date format used in every exported row (`DD.MM.YYYY`)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Wall-clock format used for start, end and duration (`HH:MM`)
pub const TIME_FORMAT: &str = "%H:%M";

/// Allowed minute offsets for shift start times
pub const SNAP_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Render a minute count as zero-padded `HH:MM`
///
/// Hours are not wrapped at 24, so monthly totals render as e.g. `"16:45"`
/// or `"112:30"`.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse an `HH:MM` wall-clock time
pub fn parse_hhmm(input: &str) -> GeneratorResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_| GeneratorError::InvalidTime {
        input: input.to_string(),
    })
}

/// Serde adapter storing [`NaiveTime`] as `"HH:MM"`
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Generation bounds
// ============================================================================

/// Inclusive range for the number of worked days in a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayCountRange {
    /// Minimum number of worked days
    pub min: u32,

    /// Maximum number of worked days
    pub max: u32,
}

impl WorkdayCountRange {
    /// Create a validated range
    pub fn new(min: u32, max: u32) -> GeneratorResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Check `1 <= min <= max`
    pub fn validate(&self) -> GeneratorResult<()> {
        if self.min == 0 {
            return Err(GeneratorError::invalid_config(
                "workdays.min",
                "must be at least 1",
            ));
        }
        if self.min > self.max {
            return Err(GeneratorError::invalid_config(
                "workdays",
                format!("min ({}) is greater than max ({})", self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl Default for WorkdayCountRange {
    fn default() -> Self {
        Self { min: 6, max: 8 }
    }
}

/// Earliest start and latest end of any shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Earliest allowed start time
    #[serde(with = "hhmm")]
    pub earliest: NaiveTime,

    /// Latest allowed end time
    #[serde(with = "hhmm")]
    pub latest: NaiveTime,
}

impl TimeWindow {
    /// Create a validated window
    pub fn new(earliest: NaiveTime, latest: NaiveTime) -> GeneratorResult<Self> {
        let window = Self { earliest, latest };
        window.validate()?;
        Ok(window)
    }

    /// Parse a window from two `HH:MM` strings
    pub fn parse(earliest: &str, latest: &str) -> GeneratorResult<Self> {
        Self::new(parse_hhmm(earliest)?, parse_hhmm(latest)?)
    }

    /// Check `earliest < latest` and that at least one snapped start fits
    pub fn validate(&self) -> GeneratorResult<()> {
        if self.earliest >= self.latest {
            return Err(GeneratorError::invalid_config(
                "window",
                format!(
                    "earliest start {} must be before latest end {}",
                    self.earliest.format(TIME_FORMAT),
                    self.latest.format(TIME_FORMAT)
                ),
            ));
        }
        if self.start_slots().is_empty() {
            return Err(GeneratorError::invalid_config(
                "window",
                "no quarter-hour start time fits inside the window",
            ));
        }
        Ok(())
    }

    /// All snapped start times inside the window
    ///
    /// Hours before the latest end hour are preferred so every start keeps
    /// headroom; a window shorter than that falls back to any snapped time
    /// in `[earliest, latest)`.
    pub fn start_slots(&self) -> Vec<NaiveTime> {
        let with_headroom: Vec<NaiveTime> = self
            .grid_times()
            .filter(|t| t.hour() < self.latest.hour())
            .collect();

        if with_headroom.is_empty() {
            self.grid_times().collect()
        } else {
            with_headroom
        }
    }

    fn grid_times(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        (self.earliest.hour()..=self.latest.hour())
            .flat_map(|h| SNAP_MINUTES.iter().map(move |&m| (h, m)))
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
            .filter(|t| *t >= self.earliest && *t < self.latest)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            earliest: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            latest: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Inclusive range for the monthly total in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourRange {
    /// Minimum total hours for a schedule to be accepted
    pub min: f64,

    /// Maximum total hours; enforced per day while assembling
    pub max: f64,
}

impl HourRange {
    /// Create a validated range
    pub fn new(min: f64, max: f64) -> GeneratorResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Check `0 <= min <= max` with finite bounds
    pub fn validate(&self) -> GeneratorResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GeneratorError::invalid_config("hours", "bounds must be finite"));
        }
        if self.min < 0.0 || self.max < 0.0 {
            return Err(GeneratorError::invalid_config(
                "hours",
                "bounds must not be negative",
            ));
        }
        if self.min > self.max {
            return Err(GeneratorError::invalid_config(
                "hours",
                format!("min ({}) is greater than max ({})", self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self {
            min: 15.0,
            max: 17.0,
        }
    }
}

// ============================================================================
// Generated values
// ============================================================================

/// A single worked shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub date: NaiveDate,

    #[serde(with = "hhmm")]
    pub start: NaiveTime,

    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl ShiftRecord {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// Length of the shift
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length in whole minutes
    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Length in fractional hours, from whole seconds
    pub fn hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }
}

/// One calendar day of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayRow {
    /// Day with a shift
    Worked(ShiftRecord),
    /// Day without hours
    Off { date: NaiveDate },
}

impl DayRow {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Worked(shift) => shift.date,
            Self::Off { date } => *date,
        }
    }

    pub fn is_worked(&self) -> bool {
        matches!(self, Self::Worked(_))
    }

    pub fn shift(&self) -> Option<&ShiftRecord> {
        match self {
            Self::Worked(shift) => Some(shift),
            Self::Off { .. } => None,
        }
    }

    /// Worked hours, zero for off days
    pub fn hours(&self) -> f64 {
        self.shift().map_or(0.0, ShiftRecord::hours)
    }

    pub fn minutes(&self) -> i64 {
        self.shift().map_or(0, ShiftRecord::minutes)
    }

    /// Format as the four-column interchange row
    pub fn to_export_row(&self) -> ExportRow {
        let date = self.date().format(DATE_FORMAT).to_string();
        match self {
            Self::Worked(shift) => ExportRow {
                date,
                start: shift.start.format(TIME_FORMAT).to_string(),
                end: shift.end.format(TIME_FORMAT).to_string(),
                total: format_minutes(shift.minutes()),
            },
            Self::Off { .. } => ExportRow {
                date,
                start: ExportRow::ZERO.to_string(),
                end: ExportRow::ZERO.to_string(),
                total: ExportRow::ZERO.to_string(),
            },
        }
    }
}

/// A complete month: one row per calendar day plus the accumulated total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySchedule {
    pub year: i32,
    pub month: u32,

    /// Rows in ascending date order, one per calendar day
    pub rows: Vec<DayRow>,

    /// Sum of worked hours over `rows`
    pub total_hours: f64,

    /// Assembler attempt that produced this schedule (1-based)
    pub attempts: u32,

    /// Selected days whose shift was dropped to stay under the monthly maximum
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<NaiveDate>,
}

impl MonthlySchedule {
    /// Build a schedule; the total is computed from `rows`
    pub fn new(
        year: i32,
        month: u32,
        rows: Vec<DayRow>,
        attempts: u32,
        dropped: Vec<NaiveDate>,
    ) -> Self {
        let total_hours = rows.iter().map(DayRow::hours).sum();
        Self {
            year,
            month,
            rows,
            total_hours,
            attempts,
            dropped,
        }
    }

    pub fn worked_rows(&self) -> impl Iterator<Item = &ShiftRecord> {
        self.rows.iter().filter_map(DayRow::shift)
    }

    pub fn worked_days(&self) -> usize {
        self.worked_rows().count()
    }

    pub fn total_minutes(&self) -> i64 {
        self.rows.iter().map(DayRow::minutes).sum()
    }

    /// Monthly total as `HH:MM`
    pub fn total_display(&self) -> String {
        format_minutes(self.total_minutes())
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.rows.iter().map(DayRow::to_export_row).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(DayRow::date)
    }

    /// `YYYY.MM`, used as sheet name and in reports
    pub fn label(&self) -> String {
        month_label(self.year, self.month)
    }

    /// Check that rows cover exactly the days of `year`/`month` in order
    pub fn covers_month(&self) -> bool {
        let mut expected = 1;
        for row in &self.rows {
            let date = row.date();
            if date.year() != self.year || date.month() != self.month || date.day() != expected {
                return false;
            }
            expected += 1;
        }

        // the last row must be the final day of the month
        self.rows
            .last()
            .and_then(|row| row.date().succ_opt())
            .is_some_and(|next| next.month() != self.month)
    }
}

/// `YYYY.MM`
pub fn month_label(year: i32, month: u32) -> String {
    format!("{year}.{month:02}")
}

/// The four-column row handed to export collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// `DD.MM.YYYY`
    pub date: String,
    /// `HH:MM`, `00:00` on off days
    pub start: String,
    /// `HH:MM`, `00:00` on off days
    pub end: String,
    /// Duration `HH:MM`
    pub total: String,
}

impl ExportRow {
    /// Column headers in field order
    pub const HEADERS: [&'static str; 4] = ["DATE", "START", "END", "TOTAL"];

    const ZERO: &'static str = "00:00";

    pub fn fields(&self) -> [&str; 4] {
        [&self.date, &self.start, &self.end, &self.total]
    }

    pub fn is_worked(&self) -> bool {
        self.start != Self::ZERO
    }
}

impl fmt::Display for ExportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<8} {:<8} {:<6}",
            self.date, self.start, self.end, self.total
        )
    }
}
