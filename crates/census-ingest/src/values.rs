//! Cell value helpers shared by the workbook reader and the normalizer.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.999_999;

/// Formats a float without a trailing `.0` for whole numbers.
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Parses a string as f64, returning None for empty or invalid strings.
///
/// A single decimal comma is accepted (`"3,5"`), as exported by Spanish
/// locale spreadsheets.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<f64>() {
        return Some(parsed);
    }
    if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        return trimmed.replace(',', ".").parse::<f64>().ok();
    }
    None
}

/// Converts an Excel serial date (1900 date system) to a timestamp.
///
/// The fractional part is the time of day, rounded to the nearest second.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    // Day 0 is 1899-12-30 once the 1900 leap-year bug is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Renders a timestamp the way the workbook reader exports date cells.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_numeric_drops_integral_fraction() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(3.25), "3.25");
        assert_eq!(format_numeric(-2.0), "-2");
    }

    #[test]
    fn parse_f64_accepts_decimal_comma() {
        assert_eq!(parse_f64(" 4.5 "), Some(4.5));
        assert_eq!(parse_f64("4,5"), Some(4.5));
        assert_eq!(parse_f64("1,234.5"), None);
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("abc"), None);
    }

    #[test]
    fn excel_serial_converts_date_and_time() {
        let value = excel_serial_to_datetime(44197.5).unwrap();
        assert_eq!(format_datetime(value), "2021-01-01 12:00:00");
        assert!(excel_serial_to_datetime(0.5).is_none());
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }
}
