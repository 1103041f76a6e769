//! Random selection of worked days
//!
//! The eligible pool (weekdays that are neither holidays nor special days)
//! is computed once and sampled without replacement, so selection always
//! terminates; a pool smaller than the minimum count is reported up front.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{GeneratorError, GeneratorResult};
use crate::calendar::HolidaySet;
use crate::models::WorkdayCountRange;

/// Draws the worked days of a month
#[derive(Debug, Clone, Copy)]
pub struct DaySelector {
    range: WorkdayCountRange,
}

impl DaySelector {
    /// Create a selector for a validated count range
    pub fn new(range: WorkdayCountRange) -> GeneratorResult<Self> {
        range.validate()?;
        Ok(Self { range })
    }

    /// Dates of `dates` that may carry a shift
    pub fn eligible_days(dates: &[NaiveDate], holidays: &HolidaySet) -> Vec<NaiveDate> {
        dates
            .iter()
            .copied()
            .filter(|d| holidays.is_eligible(d))
            .collect()
    }

    /// Pick a uniformly drawn number of distinct eligible days, sorted ascending
    ///
    /// The count is drawn from `[min, max]`; when only `max` exceeds the
    /// pool, the upper bound is capped at the pool size.
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dates: &[NaiveDate],
        holidays: &HolidaySet,
    ) -> GeneratorResult<Vec<NaiveDate>> {
        let pool = Self::eligible_days(dates, holidays);
        let min = self.range.min as usize;

        if pool.len() < min {
            return Err(GeneratorError::InsufficientEligibleDays {
                requested: self.range.min,
                available: pool.len(),
            });
        }

        let max = (self.range.max as usize).min(pool.len());
        if max < self.range.max as usize {
            tracing::debug!(
                requested_max = self.range.max,
                available = pool.len(),
                "Capping workday count at eligible pool size"
            );
        }

        let count = rng.gen_range(min..=max);
        let mut selected: Vec<NaiveDate> = pool.choose_multiple(rng, count).copied().collect();
        selected.sort_unstable();

        tracing::debug!(
            eligible = pool.len(),
            selected = selected.len(),
            "Selected worked days"
        );

        Ok(selected)
    }
}
