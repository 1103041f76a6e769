//! Semicolon-separated export
//!
//! Fields are fixed-format dates and `HH:MM` values, so no quoting is ever
//! needed. Lines end with CRLF.

use std::io::{self, Write};

use crate::models::ExportRow;

/// Field delimiter
pub const DELIMITER: char = ';';

const LINE_END: &str = "\r\n";

/// Write a header line followed by one line per row
pub fn write_csv<W: Write>(mut writer: W, rows: &[ExportRow]) -> io::Result<()> {
    write_line(&mut writer, &ExportRow::HEADERS)?;
    for row in rows {
        write_line(&mut writer, &row.fields())?;
    }
    writer.flush()
}

fn write_line<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(writer, "{DELIMITER}")?;
        }
        writer.write_all(field.as_bytes())?;
    }
    writer.write_all(LINE_END.as_bytes())
}

/// Parse rows written by [`write_csv`], skipping the header
pub fn parse_csv(content: &str) -> Vec<ExportRow> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.trim_end_matches('\r').split(DELIMITER);
            Some(ExportRow {
                date: fields.next()?.to_string(),
                start: fields.next()?.to_string(),
                end: fields.next()?.to_string(),
                total: fields.next()?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_csv(rows: &[ExportRow]) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, rows).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                date: "01.02.2024".to_string(),
                start: "17:15".to_string(),
                end: "19:00".to_string(),
                total: "01:45".to_string(),
            },
            ExportRow {
                date: "02.02.2024".to_string(),
                start: "00:00".to_string(),
                end: "00:00".to_string(),
                total: "00:00".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(&rows());
        assert_eq!(
            csv,
            "DATE;START;END;TOTAL\r\n01.02.2024;17:15;19:00;01:45\r\n02.02.2024;00:00;00:00;00:00\r\n"
        );
    }

    #[test]
    fn test_parse_written_csv() {
        let rows = rows();
        assert_eq!(parse_csv(&render_csv(&rows)), rows);
    }

    #[test]
    fn test_empty_rows_write_header_only() {
        assert_eq!(render_csv(&[]), "DATE;START;END;TOTAL\r\n");
    }
}
