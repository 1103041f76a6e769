//! Per-day shift sampling
//!
//! A start time is drawn on the quarter-hour grid inside the window and a
//! duration of 15 to 180 minutes in quarter-hour steps. The end is clamped
//! to the latest allowed end, so clamping can shorten the effective shift.

use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};
use rand::Rng;

use super::error::GeneratorResult;
use crate::models::{ShiftRecord, TimeWindow};

/// Step between drawable durations
pub const DURATION_STEP_MINUTES: i64 = 15;

/// Longest drawable duration
pub const MAX_DURATION_MINUTES: i64 = 180;

/// Samples shifts inside a validated [`TimeWindow`]
#[derive(Debug, Clone)]
pub struct ShiftSampler {
    window: TimeWindow,
    /// Start candidates grouped by hour; no group is empty
    starts_by_hour: Vec<Vec<NaiveTime>>,
}

impl ShiftSampler {
    pub fn new(window: TimeWindow) -> GeneratorResult<Self> {
        window.validate()?;

        let mut starts_by_hour: Vec<Vec<NaiveTime>> = Vec::new();
        for slot in window.start_slots() {
            match starts_by_hour.last_mut() {
                Some(group) if group[0].hour() == slot.hour() => group.push(slot),
                _ => starts_by_hour.push(vec![slot]),
            }
        }

        Ok(Self {
            window,
            starts_by_hour,
        })
    }

    /// Draw one shift for `date`
    ///
    /// The hour is drawn first, uniformly over hours that have a start
    /// candidate, then the minute among that hour's candidates.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, date: NaiveDate) -> ShiftRecord {
        let hour = &self.starts_by_hour[rng.gen_range(0..self.starts_by_hour.len())];
        let start = hour[rng.gen_range(0..hour.len())];

        let steps = rng.gen_range(1..=MAX_DURATION_MINUTES / DURATION_STEP_MINUTES);
        let drawn = TimeDelta::minutes(steps * DURATION_STEP_MINUTES);

        let (end, wrapped) = start.overflowing_add_signed(drawn);
        let end = if wrapped != 0 || end > self.window.latest {
            self.window.latest
        } else {
            end
        };

        ShiftRecord::new(date, start, end)
    }
}
