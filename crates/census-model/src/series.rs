//! Weekly aggregate series and lagged rows.

use std::collections::BTreeMap;

use crate::category::Category;
use crate::record::IndicatorVector;
use crate::week::CalendarWeek;

/// Aggregate of every record of one category admitted in one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregateRow {
    pub week: CalendarWeek,
    /// Number of admissions; always at least 1.
    pub demand: u32,
    pub mean_length_of_stay: f64,
    /// Share of the week's records carrying each indicator.
    pub indicators: IndicatorVector,
    /// Share of the week's records per retained service code.
    pub service_mix: BTreeMap<String, f64>,
}

impl WeeklyAggregateRow {
    pub fn service_share(&self, code: &str) -> f64 {
        self.service_mix.get(code).copied().unwrap_or(0.0)
    }
}

/// Calendar-keyed weekly series of one category.
///
/// A missing key is the only representation of a week without data.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWeeklySeries {
    pub category: Category,
    pub weeks: BTreeMap<CalendarWeek, WeeklyAggregateRow>,
    /// Encoded records that fed this series before the demand floor.
    pub source_records: usize,
    /// Weeks removed because demand was below the weekly floor.
    pub weeks_below_floor: usize,
}

impl CategoryWeeklySeries {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            weeks: BTreeMap::new(),
            source_records: 0,
            weeks_below_floor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn get(&self, week: CalendarWeek) -> Option<&WeeklyAggregateRow> {
        self.weeks.get(&week)
    }

    pub fn first_week(&self) -> Option<CalendarWeek> {
        self.weeks.keys().next().copied()
    }

    pub fn last_week(&self) -> Option<CalendarWeek> {
        self.weeks.keys().next_back().copied()
    }
}

/// A week together with the rows found at each lag offset.
///
/// Built only when every configured offset resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedRow {
    pub current: WeeklyAggregateRow,
    pub lags: BTreeMap<u32, WeeklyAggregateRow>,
}

impl LaggedRow {
    pub fn week(&self) -> CalendarWeek {
        self.current.week
    }

    pub fn lag(&self, offset: u32) -> Option<&WeeklyAggregateRow> {
        self.lags.get(&offset)
    }
}
