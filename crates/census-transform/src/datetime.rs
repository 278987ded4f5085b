//! Admission timestamp parsing.
//!
//! Spreadsheet exports disagree on date layout, so a list of formats is tried
//! in order. Day-first layouts are tried before month-first ones; a value
//! like `03/04/2022` is read as 3 April.
//!
//! chrono's `%Y` accepts one to four digits, so a short-year value such as
//! `03/04/22` also matches `%Y/%m/%d` as the year 3. Every candidate is
//! therefore checked against [`EARLIEST_YEAR`]..=[`LATEST_YEAR`] and the next
//! format is tried when it falls outside.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use census_ingest::{excel_serial_to_datetime, parse_f64};

pub const EARLIEST_YEAR: i32 = 1900;
pub const LATEST_YEAR: i32 = 2100;

/// Smallest serial taken as a date (1927-05-18). Shorter integers are more
/// likely years or codes than dates.
const MIN_SERIAL: f64 = 10_000.0;

fn plausible(date: NaiveDate) -> bool {
    (EARLIEST_YEAR..=LATEST_YEAR).contains(&date.year())
}

/// Parse an admission timestamp. Date-only values are taken at midnight.
pub fn parse_admission_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed)
        .or_else(|| try_parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN)))
        .or_else(|| try_parse_serial(trimmed))
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d-%b-%Y %H:%M:%S",
        "%d-%b-%Y %H:%M",
        "%d/%m/%y %H:%M:%S",
        "%d/%m/%y %H:%M",
        "%d-%m-%y %H:%M:%S",
        "%d-%m-%y %H:%M",
    ];
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .filter(|parsed| plausible(parsed.date()))
    })
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%m/%d/%Y",
        "%d-%m-%Y",
        "%d.%m.%Y",
        "%d-%b-%Y",
        "%d-%B-%Y",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%Y%m%d",
        "%d/%m/%y",
        "%d-%m-%y",
    ];
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .filter(|parsed| plausible(*parsed))
    })
}

/// Excel serial numbers survive as text when a date column was typed as
/// numbers in the source workbook.
fn try_parse_serial(value: &str) -> Option<NaiveDateTime> {
    // Compact dates (20240115) are handled above; real serials are short.
    if value.len() > 12 {
        return None;
    }
    parse_f64(value)
        .filter(|serial| *serial >= MIN_SERIAL)
        .and_then(excel_serial_to_datetime)
        .filter(|parsed| plausible(parsed.date()))
}
