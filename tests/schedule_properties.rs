//! Property tests for generated schedules over seeds and bounds

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::{assert_schedule_invariants, seeded_rng};
use proptest::prelude::*;
use stundenzettel::calendar::{dates_in_month, holidays_for_year, GermanyNrw};
use stundenzettel::generator::{DaySelector, GeneratorError, ScheduleGenerator, ShiftSampler};
use stundenzettel::models::{HourRange, TimeWindow, WorkdayCountRange};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every outcome is an accepted schedule or one of the two documented failures
    #[test]
    fn generated_schedules_respect_bounds(
        seed in any::<u64>(),
        year in 2000i32..=2100,
        month in 1u32..=12,
        min_days in 1u32..=8,
        extra_days in 0u32..=4,
        min_hours in 0u32..=12,
        extra_hours in 0u32..=20,
    ) {
        let workdays = WorkdayCountRange::new(min_days, min_days + extra_days).unwrap();
        let hours = HourRange::new(min_hours as f64, (min_hours + extra_hours) as f64).unwrap();
        let window = TimeWindow::default();
        let generator = ScheduleGenerator::new(workdays, window, hours)
            .unwrap()
            .with_max_attempts(100);

        let holidays = holidays_for_year(&GermanyNrw, year).unwrap();
        let pool = DaySelector::eligible_days(&dates_in_month(year, month).unwrap(), &holidays);

        match generator.generate_with_holidays(&mut seeded_rng(seed), year, month, &holidays) {
            Ok(schedule) => {
                let selected = (schedule.worked_days() + schedule.dropped.len()) as u32;
                prop_assert!(selected >= workdays.min);
                prop_assert!(selected <= workdays.max.min(pool.len() as u32));
                prop_assert!(schedule.attempts >= 1 && schedule.attempts <= 100);
                assert_schedule_invariants(&schedule, &holidays, window, hours);
            }
            Err(GeneratorError::Unsatisfiable { attempts, best_total, min_hours: min }) => {
                prop_assert_eq!(attempts, 100);
                prop_assert!(best_total < min);
            }
            Err(GeneratorError::InsufficientEligibleDays { requested, available }) => {
                prop_assert_eq!(requested, workdays.min);
                prop_assert_eq!(available, pool.len());
                prop_assert!(pool.len() < workdays.min as usize);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    /// Sampled shifts stay inside the window and last at most three hours
    #[test]
    fn shifts_stay_inside_window(
        seed in any::<u64>(),
        start_hour in 0u32..=20,
        quarter in 0u32..4,
        length_hours in 1u32..=3,
    ) {
        let earliest = NaiveTime::from_hms_opt(start_hour, quarter * 15, 0).unwrap();
        let latest = NaiveTime::from_hms_opt(start_hour + length_hours, 0, 0).unwrap();
        let window = TimeWindow::new(earliest, latest).unwrap();
        let sampler = ShiftSampler::new(window).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();

        let mut rng = seeded_rng(seed);
        for _ in 0..20 {
            let shift = sampler.sample(&mut rng, date);
            prop_assert!(shift.start >= earliest);
            prop_assert!(shift.start < latest);
            prop_assert!(shift.end > shift.start);
            prop_assert!(shift.end <= latest);
            prop_assert!(shift.minutes() <= 180);
        }
    }
}
