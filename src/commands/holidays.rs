use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;

use stundenzettel::calendar::{holidays_for_year, GermanyNrw, Holiday, HolidayCalendar};
use stundenzettel::models::DATE_FORMAT;

#[derive(Serialize)]
struct HolidayListing {
    year: i32,
    calendar: String,
    holidays: Vec<Holiday>,
    special_days: Vec<chrono::NaiveDate>,
}

pub fn holidays(year: Option<i32>, json: bool) -> Result<()> {
    let year = year.unwrap_or_else(|| Local::now().year());
    let calendar = GermanyNrw;
    let set = holidays_for_year(&calendar, year)?;

    if json {
        let listing = HolidayListing {
            year,
            calendar: calendar.name().to_string(),
            holidays: set.holidays().collect(),
            special_days: set.special_days().copied().collect(),
        };
        let output =
            serde_json::to_string_pretty(&listing).context("Failed to serialize holidays")?;
        println!("{output}");
        return Ok(());
    }

    println!("Holidays {year} ({})", calendar.name());
    println!("================================");
    for holiday in set.holidays() {
        println!(
            "{}  {:<3} {}",
            holiday.date.format(DATE_FORMAT),
            holiday.date.format("%a"),
            holiday.name
        );
    }

    println!("\nSpecial days (never scheduled):");
    for date in set.special_days() {
        println!("{}  {:<3}", date.format(DATE_FORMAT), date.format("%a"));
    }

    Ok(())
}
