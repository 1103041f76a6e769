//! stundenzettel - Plausible monthly timesheet generator
//!
//! Picks a random subset of business days in a month, gives each a shift
//! inside a configured time window and accepts the month once its total
//! reaches the configured minimum hours without exceeding the maximum.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`calendar`] - Month enumeration, public holidays and special days
//! - [`generator`] - Day selection, shift sampling and the bounded retry loop
//! - [`processor`] - Month-level retry, preview and export hand-off
//! - [`storage`] - CSV, Markdown and JSON exports
//! - [`models`] - Bounds, shifts, rows and schedules
//! - [`config`] - Configuration management and settings
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use stundenzettel::config::Config;
//! use stundenzettel::generator::ScheduleGenerator;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     config.validate()?;
//!
//!     let generator = ScheduleGenerator::from_config(&config.generator)?;
//!     let mut rng = ChaCha8Rng::seed_from_u64(2024);
//!     let schedule = generator.generate(&mut rng, 2024, 2)?;
//!
//!     for row in schedule.export_rows() {
//!         println!("{row}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod processor;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::calendar::{GermanyNrw, HolidayCalendar, HolidaySet};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result, TimesheetErrorTrait};
    pub use crate::generator::{GeneratorError, ScheduleGenerator};
    pub use crate::models::{
        DayRow, ExportRow, HourRange, MonthlySchedule, ShiftRecord, TimeWindow, WorkdayCountRange,
    };
    pub use crate::processor::{BulkReport, MonthOutcome, MonthProcessor};
    pub use crate::storage::{ExportFormat, TimesheetStorage};
}

// Direct re-exports for convenience
pub use models::{DayRow, MonthlySchedule, ShiftRecord};
