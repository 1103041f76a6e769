//! Printable timesheet rendered with the Handlebars template engine
//!
//! Produces the document counterpart of the CSV export: a title, the
//! German column headers, one row per day (worked days in bold), the
//! monthly total and an optional signature line.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::Result;
use crate::models::{MonthlySchedule, DATE_FORMAT};

/// Default timesheet template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/timesheet.hbs");

const TEMPLATE_NAME: &str = "timesheet";

/// One table row for rendering
#[derive(Debug, Serialize)]
struct RowTemplateData {
    date: String,
    start: String,
    end: String,
    total: String,
    worked: bool,
}

/// Template data for rendering
#[derive(Debug, Serialize)]
struct TimesheetTemplateData {
    title: String,
    rows: Vec<RowTemplateData>,
    total: String,
    signature_line: Option<String>,
}

impl TimesheetTemplateData {
    fn new(schedule: &MonthlySchedule, signature: Option<&str>) -> Self {
        let rows = schedule
            .export_rows()
            .into_iter()
            .map(|row| RowTemplateData {
                worked: row.is_worked(),
                date: row.date,
                start: row.start,
                end: row.end,
                total: row.total,
            })
            .collect();

        // dated with the last day of the month
        let signature_line = signature.and_then(|name| {
            schedule
                .last_date()
                .map(|date| format!("{}, {name}", date.format(DATE_FORMAT)))
        });

        Self {
            title: format!("Stundenzettel {}", schedule.label()),
            rows,
            total: schedule.total_display(),
            signature_line,
        }
    }
}

/// Timesheet writer with Handlebars template engine
pub struct MarkdownWriter<'a> {
    handlebars: Handlebars<'a>,
    signature: Option<String>,
}

impl<'a> MarkdownWriter<'a> {
    /// Create a new MarkdownWriter with the default template
    pub fn new(signature: Option<String>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;

        Ok(Self {
            handlebars,
            signature,
        })
    }

    /// Render a schedule to a markdown string
    pub fn render(&self, schedule: &MonthlySchedule) -> Result<String> {
        let data = TimesheetTemplateData::new(schedule, self.signature.as_deref());
        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayRow, ShiftRecord};
    use chrono::{NaiveDate, NaiveTime};

    fn schedule() -> MonthlySchedule {
        let date = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let time = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let mut rows: Vec<DayRow> = (1..=29).map(|d| DayRow::Off { date: date(d) }).collect();
        rows[4] = DayRow::Worked(ShiftRecord::new(date(5), time(17, 0), time(19, 45)));
        rows[6] = DayRow::Worked(ShiftRecord::new(date(7), time(20, 30), time(22, 0)));
        MonthlySchedule::new(2024, 2, rows, 1, Vec::new())
    }

    #[test]
    fn test_render_timesheet() {
        let writer = MarkdownWriter::new(Some("Erika Mustermann".to_string())).unwrap();
        let md = writer.render(&schedule()).unwrap();

        assert!(md.contains("# Stundenzettel 2024.02"));
        assert!(md.contains("| DATUM | ANFANG | ENDE | GESAMT |"));
        assert!(md.contains("| **05.02.2024** | **17:00** | **19:45** | **02:45** |"));
        assert!(md.contains("| 06.02.2024 | 00:00 | 00:00 | 00:00 |"));
        assert!(md.contains("**Gesamt:** | **04:15**"));
        assert!(md.contains("29.02.2024, Erika Mustermann"));
    }

    #[test]
    fn test_render_without_signature() {
        let writer = MarkdownWriter::new(None).unwrap();
        let md = writer.render(&schedule()).unwrap();
        assert!(!md.contains("29.02.2024,"));
    }

    #[test]
    fn test_signature_is_not_escaped() {
        let writer = MarkdownWriter::new(Some("Müller & Söhne".to_string())).unwrap();
        let md = writer.render(&schedule()).unwrap();
        assert!(md.contains("Müller & Söhne"));
    }
}
