//! Calendar provider
//!
//! Enumerates the days of a month and reports the non-working days of a
//! year: the public holidays of a jurisdiction plus three fixed special days
//! around the turn of the year (Dec 24, Dec 31 and the following Jan 1).

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::generator::error::{GeneratorError, GeneratorResult};

/// All days of `year`/`month` in ascending order
pub fn dates_in_month(year: i32, month: u32) -> GeneratorResult<Vec<NaiveDate>> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(GeneratorError::invalid_date(year, month, 1))?;

    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}

/// Monday to Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Easter Sunday (anonymous Gregorian algorithm)
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// A named public holiday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Source of public holidays for one jurisdiction
pub trait HolidayCalendar: Send + Sync {
    fn name(&self) -> &str;

    /// Public holidays of `year`, keyed by date
    fn holidays(&self, year: i32) -> GeneratorResult<BTreeMap<NaiveDate, String>>;
}

/// Germany, North Rhine-Westphalia
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanyNrw;

impl HolidayCalendar for GermanyNrw {
    fn name(&self) -> &str {
        "Germany (NW)"
    }

    fn holidays(&self, year: i32) -> GeneratorResult<BTreeMap<NaiveDate, String>> {
        let fixed = |month: u32, day: u32| {
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(GeneratorError::invalid_date(year, month, day))
        };
        let easter = easter_sunday(year).ok_or(GeneratorError::invalid_date(year, 3, 21))?;
        let from_easter = |days: i64| easter + TimeDelta::days(days);

        let mut holidays = BTreeMap::new();
        holidays.insert(fixed(1, 1)?, "Neujahr".to_string());
        holidays.insert(from_easter(-2), "Karfreitag".to_string());
        holidays.insert(from_easter(1), "Ostermontag".to_string());
        holidays.insert(fixed(5, 1)?, "Erster Mai".to_string());
        holidays.insert(from_easter(39), "Christi Himmelfahrt".to_string());
        holidays.insert(from_easter(50), "Pfingstmontag".to_string());
        holidays.insert(from_easter(60), "Fronleichnam".to_string());
        if year >= 1990 {
            holidays.insert(fixed(10, 3)?, "Tag der Deutschen Einheit".to_string());
        }
        // 500th anniversary, observed nationwide
        if year == 2017 {
            holidays.insert(fixed(10, 31)?, "Reformationstag".to_string());
        }
        holidays.insert(fixed(11, 1)?, "Allerheiligen".to_string());
        holidays.insert(fixed(12, 25)?, "Erster Weihnachtstag".to_string());
        holidays.insert(fixed(12, 26)?, "Zweiter Weihnachtstag".to_string());

        Ok(holidays)
    }
}

/// Dec 24 and Dec 31 of `year`, Jan 1 of `year + 1`
pub fn special_days(year: i32) -> GeneratorResult<BTreeSet<NaiveDate>> {
    [(year, 12, 24), (year, 12, 31), (year + 1, 1, 1)]
        .into_iter()
        .map(|(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d).ok_or(GeneratorError::invalid_date(y, m, d))
        })
        .collect()
}

/// Non-working days of one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySet {
    year: i32,
    holidays: BTreeMap<NaiveDate, String>,
    special_days: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new(
        year: i32,
        holidays: BTreeMap<NaiveDate, String>,
        special_days: BTreeSet<NaiveDate>,
    ) -> Self {
        Self {
            year,
            holidays,
            special_days,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Holiday or special day
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.is_holiday(date) || self.is_special_day(date)
    }

    pub fn is_holiday(&self, date: &NaiveDate) -> bool {
        self.holidays.contains_key(date)
    }

    pub fn is_special_day(&self, date: &NaiveDate) -> bool {
        self.special_days.contains(date)
    }

    pub fn holiday_name(&self, date: &NaiveDate) -> Option<&str> {
        self.holidays.get(date).map(String::as_str)
    }

    /// A weekday that is neither a holiday nor a special day
    pub fn is_eligible(&self, date: &NaiveDate) -> bool {
        is_weekday(*date) && !self.contains(date)
    }

    pub fn holidays(&self) -> impl Iterator<Item = Holiday> + '_ {
        self.holidays.iter().map(|(date, name)| Holiday {
            date: *date,
            name: name.clone(),
        })
    }

    pub fn special_days(&self) -> impl Iterator<Item = &NaiveDate> {
        self.special_days.iter()
    }
}

/// Holidays of `calendar` for `year` plus the fixed special days
pub fn holidays_for_year(calendar: &dyn HolidayCalendar, year: i32) -> GeneratorResult<HolidaySet> {
    let holidays = calendar.holidays(year)?;
    let special = special_days(year)?;

    tracing::debug!(
        calendar = calendar.name(),
        year = year,
        holidays = holidays.len(),
        "Loaded holiday calendar"
    );

    Ok(HolidaySet::new(year, holidays, special))
}
