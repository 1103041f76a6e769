//! Constrained random schedule generation
//!
//! One generation for a month runs these steps:
//!
//! ```text
//! dates_in_month ──► DaySelector ──► worked days
//!                         ▲               │
//!  holidays_for_year ─────┘               ▼
//!                              ScheduleAssembler ──► MonthlySchedule
//!                              (ShiftSampler per day, ≤ max_attempts)
//! ```
//!
//! Days are selected once per generation; each assembler attempt resamples
//! the shift times for that selection. Month-level retries (which select
//! fresh days) belong to [`crate::processor`].
//!
//! # Modules
//!
//! - [`selector`] - Eligible-day pool and worked-day sampling
//! - [`shift`] - Start/end sampling on the quarter-hour grid
//! - [`assembler`] - Month assembly and the bounded retry loop
//! - [`error`] - [`GeneratorError`]

pub mod assembler;
pub mod error;
pub mod selector;
pub mod shift;

use rand::Rng;
use std::collections::BTreeSet;

pub use assembler::{ScheduleAssembler, MAX_ATTEMPTS};
pub use error::{GeneratorError, GeneratorResult};
pub use selector::DaySelector;
pub use shift::ShiftSampler;

use crate::calendar::{dates_in_month, holidays_for_year, GermanyNrw, HolidayCalendar, HolidaySet};
use crate::config::GeneratorConfig;
use crate::models::{HourRange, MonthlySchedule, TimeWindow, WorkdayCountRange};

/// Generates monthly schedules for a fixed set of bounds
pub struct ScheduleGenerator {
    selector: DaySelector,
    assembler: ScheduleAssembler,
    calendar: Box<dyn HolidayCalendar>,
}

impl ScheduleGenerator {
    /// Create a generator using the default holiday calendar
    pub fn new(
        workdays: WorkdayCountRange,
        window: TimeWindow,
        hours: HourRange,
    ) -> GeneratorResult<Self> {
        Ok(Self {
            selector: DaySelector::new(workdays)?,
            assembler: ScheduleAssembler::new(window, hours)?,
            calendar: Box::new(GermanyNrw),
        })
    }

    pub fn from_config(config: &GeneratorConfig) -> GeneratorResult<Self> {
        Ok(Self::new(config.workdays, config.window, config.hours)?
            .with_max_attempts(config.max_attempts))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.assembler = self.assembler.with_max_attempts(max_attempts);
        self
    }

    pub fn with_calendar(mut self, calendar: impl HolidayCalendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    pub fn calendar(&self) -> &dyn HolidayCalendar {
        self.calendar.as_ref()
    }

    /// Holidays and special days of `year` for this generator's calendar
    pub fn holidays(&self, year: i32) -> GeneratorResult<HolidaySet> {
        holidays_for_year(self.calendar.as_ref(), year)
    }

    /// Generate one month, loading the holiday calendar for its year
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        year: i32,
        month: u32,
    ) -> GeneratorResult<MonthlySchedule> {
        let holidays = self.holidays(year)?;
        self.generate_with_holidays(rng, year, month, &holidays)
    }

    /// Generate one month against a precomputed holiday set
    pub fn generate_with_holidays<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        year: i32,
        month: u32,
        holidays: &HolidaySet,
    ) -> GeneratorResult<MonthlySchedule> {
        let dates = dates_in_month(year, month)?;
        let worked: BTreeSet<_> = self
            .selector
            .select(rng, &dates, holidays)?
            .into_iter()
            .collect();

        self.assembler.assemble(rng, year, month, &dates, &worked)
    }
}

impl std::fmt::Debug for ScheduleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleGenerator")
            .field("selector", &self.selector)
            .field("assembler", &self.assembler)
            .field("calendar", &self.calendar.name())
            .finish()
    }
}
