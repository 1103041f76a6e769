//! Common test utilities

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stundenzettel::calendar::{dates_in_month, HolidaySet};
use stundenzettel::generator::ScheduleGenerator;
use stundenzettel::models::{HourRange, MonthlySchedule, TimeWindow, WorkdayCountRange};

/// Deterministic generator for reproducible tests
#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator with the default bounds (6-8 days, 17:00-22:00, 15-17 h)
#[allow(dead_code)]
pub fn default_generator() -> ScheduleGenerator {
    ScheduleGenerator::new(
        WorkdayCountRange::default(),
        TimeWindow::default(),
        HourRange::default(),
    )
    .unwrap()
}

/// Generator with custom day and hour bounds in the default window
#[allow(dead_code)]
pub fn generator_with(workdays: (u32, u32), hours: (f64, f64)) -> ScheduleGenerator {
    ScheduleGenerator::new(
        WorkdayCountRange::new(workdays.0, workdays.1).unwrap(),
        TimeWindow::default(),
        HourRange::new(hours.0, hours.1).unwrap(),
    )
    .unwrap()
}

/// Assert the invariants every accepted schedule must satisfy
#[allow(dead_code)]
pub fn assert_schedule_invariants(
    schedule: &MonthlySchedule,
    holidays: &HolidaySet,
    window: TimeWindow,
    hours: HourRange,
) {
    assert!(schedule.covers_month(), "rows must cover the whole month");
    let days = dates_in_month(schedule.year, schedule.month).unwrap();
    assert_eq!(schedule.rows.len(), days.len());

    for (row, day) in schedule.rows.iter().zip(1u32..) {
        assert_eq!(row.date().day(), day);
        assert_eq!(row.date().month(), schedule.month);
    }

    for shift in schedule.worked_rows() {
        assert!(!is_weekend(shift.date), "{} is a weekend", shift.date);
        assert!(!holidays.contains(&shift.date), "{} is a holiday", shift.date);
        assert!(shift.start >= window.earliest);
        assert!(shift.end <= window.latest);
        assert!(shift.end > shift.start);
        assert_eq!(shift.start.minute() % 15, 0);
        if shift.end != window.latest {
            assert_eq!(shift.end.minute() % 15, 0);
        }
    }

    let sum: f64 = schedule.worked_rows().map(|s| s.hours()).sum();
    assert!((schedule.total_hours - sum).abs() < 1e-9);
    assert!(schedule.total_hours >= hours.min);
    assert!(schedule.total_hours <= hours.max);
}

#[allow(dead_code)]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
