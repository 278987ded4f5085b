//! Calendar weeks and seasons.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WeekParseError;

/// ISO-8601 week of a year.
///
/// Ordering is chronological. Displays as `YYYY-WW` with a zero-padded week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarWeek {
    year: i32,
    week: u32,
}

impl CalendarWeek {
    /// Build a week from an ISO year and week number, rejecting weeks that
    /// do not exist in that year (e.g. week 53 of a short year).
    pub fn new(year: i32, week: u32) -> Result<Self, WeekParseError> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(Self::from_date)
            .ok_or(WeekParseError::OutOfRange { year, week })
    }

    /// The ISO week containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn week(self) -> u32 {
        self.week
    }

    /// Monday of this week.
    pub fn monday(self) -> NaiveDate {
        // (year, week) always comes from a real date, so the lookup succeeds.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// The week `weeks` calendar weeks earlier.
    ///
    /// Returns `None` only when the result falls outside chrono's date range.
    pub fn minus_weeks(self, weeks: u32) -> Option<Self> {
        self.monday()
            .checked_sub_days(Days::new(u64::from(weeks) * 7))
            .map(Self::from_date)
    }

    /// The week `weeks` calendar weeks later.
    pub fn plus_weeks(self, weeks: u32) -> Option<Self> {
        self.monday()
            .checked_add_days(Days::new(u64::from(weeks) * 7))
            .map(Self::from_date)
    }
}

impl fmt::Display for CalendarWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.week)
    }
}

impl FromStr for CalendarWeek {
    type Err = WeekParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let format_error = || WeekParseError::Format(s.to_string());
        let (year, week) = trimmed.split_once('-').ok_or_else(format_error)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(format_error());
        }
        let year: i32 = year.parse().map_err(|_| format_error())?;
        let week: u32 = week.parse().map_err(|_| format_error())?;
        Self::new(year, week)
    }
}

impl Serialize for CalendarWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Southern-hemisphere season of an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Verano,
    Otono,
    Invierno,
    Primavera,
}

impl Season {
    /// Dec-Feb verano, Mar-May otoño, Jun-Aug invierno, Sep-Nov primavera.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Verano,
            3..=5 => Season::Otono,
            6..=8 => Season::Invierno,
            _ => Season::Primavera,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    /// Spanish display name with accents.
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Verano => "verano",
            Season::Otono => "otoño",
            Season::Invierno => "invierno",
            Season::Primavera => "primavera",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
