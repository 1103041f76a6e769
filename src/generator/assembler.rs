//! Month assembly with bounded rejection sampling
//!
//! Each attempt walks the month in date order, sampling a shift for every
//! selected day. A shift that would push the running total above the
//! monthly maximum is dropped and its day becomes an off row. An attempt
//! whose total reaches the monthly minimum is accepted; otherwise the whole
//! month is rebuilt, up to a fixed number of attempts.

use chrono::NaiveDate;
use rand::Rng;
use std::collections::BTreeSet;

use super::error::{GeneratorError, GeneratorResult};
use super::shift::ShiftSampler;
use crate::models::{DayRow, HourRange, MonthlySchedule, TimeWindow};

/// Attempts per generation before giving up
pub const MAX_ATTEMPTS: u32 = 1000;

/// Rows of a single attempt
#[derive(Debug)]
struct Attempt {
    rows: Vec<DayRow>,
    total_hours: f64,
    dropped: Vec<NaiveDate>,
}

/// Builds whole months from a worked-day set
#[derive(Debug, Clone)]
pub struct ScheduleAssembler {
    sampler: ShiftSampler,
    hours: HourRange,
    max_attempts: u32,
}

impl ScheduleAssembler {
    pub fn new(window: TimeWindow, hours: HourRange) -> GeneratorResult<Self> {
        hours.validate()?;
        Ok(Self {
            sampler: ShiftSampler::new(window)?,
            hours,
            max_attempts: MAX_ATTEMPTS,
        })
    }

    /// Override the attempt budget (at least one attempt always runs)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Assemble a schedule for `dates`, working on the days in `worked`
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        year: i32,
        month: u32,
        dates: &[NaiveDate],
        worked: &BTreeSet<NaiveDate>,
    ) -> GeneratorResult<MonthlySchedule> {
        let mut best_total: f64 = 0.0;

        for attempt in 1..=self.max_attempts {
            let built = self.build(rng, dates, worked);

            if built.total_hours >= self.hours.min {
                tracing::debug!(
                    year = year,
                    month = month,
                    attempts = attempt,
                    total_hours = built.total_hours,
                    dropped = built.dropped.len(),
                    "Schedule accepted"
                );
                return Ok(MonthlySchedule::new(
                    year,
                    month,
                    built.rows,
                    attempt,
                    built.dropped,
                ));
            }

            best_total = best_total.max(built.total_hours);
        }

        tracing::debug!(
            year = year,
            month = month,
            attempts = self.max_attempts,
            best_total = best_total,
            "Attempt budget exhausted"
        );

        Err(GeneratorError::Unsatisfiable {
            attempts: self.max_attempts,
            best_total,
            min_hours: self.hours.min,
        })
    }

    fn build<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dates: &[NaiveDate],
        worked: &BTreeSet<NaiveDate>,
    ) -> Attempt {
        let mut rows = Vec::with_capacity(dates.len());
        let mut total_hours = 0.0;
        let mut dropped = Vec::new();

        for &date in dates {
            if !worked.contains(&date) {
                rows.push(DayRow::Off { date });
                continue;
            }

            let shift = self.sampler.sample(rng, date);
            let hours = shift.hours();
            if total_hours + hours > self.hours.max {
                dropped.push(date);
                rows.push(DayRow::Off { date });
                continue;
            }

            total_hours += hours;
            rows.push(DayRow::Worked(shift));
        }

        Attempt {
            rows,
            total_hours,
            dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::dates_in_month;
    use chrono::Datelike;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn worked(days: &[u32]) -> BTreeSet<NaiveDate> {
        days.iter().map(|&d| date(d)).collect()
    }

    #[test]
    fn test_assemble_covers_every_day() {
        let dates = dates_in_month(2024, 2).unwrap();
        let assembler =
            ScheduleAssembler::new(TimeWindow::default(), HourRange::new(0.0, 40.0).unwrap())
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let schedule = assembler
            .assemble(&mut rng, 2024, 2, &dates, &worked(&[1, 5, 6, 7]))
            .unwrap();

        assert_eq!(schedule.rows.len(), 29);
        assert!(schedule.covers_month());
        assert_eq!(schedule.worked_days(), 4);
        assert_eq!(schedule.attempts, 1);
        for row in &schedule.rows {
            assert_eq!(row.is_worked(), [1, 5, 6, 7].contains(&row.date().day()));
        }
    }

    #[test]
    fn test_zero_minimum_accepts_first_attempt() {
        let dates = dates_in_month(2024, 2).unwrap();
        let assembler =
            ScheduleAssembler::new(TimeWindow::default(), HourRange::new(0.0, 0.0).unwrap())
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let schedule = assembler
            .assemble(&mut rng, 2024, 2, &dates, &worked(&[1, 2]))
            .unwrap();

        // every shift is positive, so a zero maximum drops all of them
        assert_eq!(schedule.rows.len(), 29);
        assert_eq!(schedule.worked_days(), 0);
        assert_eq!(schedule.dropped, vec![date(1), date(2)]);
        assert_eq!(schedule.total_hours, 0.0);
    }

    #[test]
    fn test_running_total_never_exceeds_max() {
        let dates = dates_in_month(2024, 2).unwrap();
        let all: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        let assembler =
            ScheduleAssembler::new(TimeWindow::default(), HourRange::new(5.0, 10.0).unwrap())
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        for _ in 0..50 {
            let schedule = assembler.assemble(&mut rng, 2024, 2, &dates, &all).unwrap();
            assert!(schedule.total_hours <= 10.0);
            assert!(schedule.total_hours >= 5.0);
            assert_eq!(schedule.worked_days() + schedule.dropped.len(), 29);
        }
    }

    #[test]
    fn test_unreachable_minimum_exhausts_budget() {
        let dates = dates_in_month(2024, 2).unwrap();
        let assembler =
            ScheduleAssembler::new(TimeWindow::default(), HourRange::new(100.0, 120.0).unwrap())
                .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let err = assembler
            .assemble(&mut rng, 2024, 2, &dates, &worked(&[1, 2, 5, 6, 7, 8, 9, 12]))
            .unwrap_err();

        match err {
            GeneratorError::Unsatisfiable {
                attempts,
                best_total,
                min_hours,
            } => {
                assert_eq!(attempts, MAX_ATTEMPTS);
                assert!(best_total <= 24.0);
                assert_eq!(min_hours, 100.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_attempt_budget() {
        let dates = dates_in_month(2024, 2).unwrap();
        let assembler =
            ScheduleAssembler::new(TimeWindow::default(), HourRange::new(50.0, 60.0).unwrap())
                .unwrap()
                .with_max_attempts(7);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let err = assembler
            .assemble(&mut rng, 2024, 2, &dates, &worked(&[1]))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Unsatisfiable { attempts: 7, .. }));

        assert_eq!(assembler.clone().with_max_attempts(0).max_attempts(), 1);
    }
}
