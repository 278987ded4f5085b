//! Weekly dataset updates.
//!
//! When a week closes, a ward reports a [`WeeklySummary`] for it. Applying the
//! summary to a stored category dataset does two things:
//!
//! - backfills `demanda_pacientes` of the reported week when that row exists
//! - writes the row of the following week, whose demand is still unknown and
//!   whose lag features come from the summary and from stored history
//!
//! Stored datasets are edited as plain CSV tables. Columns are addressed by
//! name, so datasets with or without service columns are handled alike.
//! Demand lags are resolved by week arithmetic, the same way the pipeline
//! builds them.

use tracing::{debug, info, warn};

use census_ingest::format_numeric;
use census_model::{CalendarWeek, Category, Indicator, WeeklySummary};

use crate::error::{PipelineError, Result};
use crate::frame::{DEMAND_COLUMN, LENGTH_OF_STAY_COLUMN, WEEK_COLUMN, WEEK_NUMBER_COLUMN};

/// Category column prepended to prediction rows.
pub const CATEGORY_COLUMN: &str = "complejidad";

const DEMAND_LAG_PREFIX: &str = "demanda_lag";

/// A stored dataset loaded as text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    week_index: usize,
    demand_index: usize,
}

impl DatasetTable {
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|error| PipelineError::Csv(error.to_string()))?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|error| PipelineError::Csv(error.to_string()))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        let required = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| PipelineError::Dataset(format!("missing column {name}")))
        };
        let week_index = required(WEEK_COLUMN)?;
        let demand_index = required(DEMAND_COLUMN)?;
        Ok(Self {
            headers,
            rows,
            week_index,
            demand_index,
        })
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .map_err(|error| PipelineError::Csv(error.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|error| PipelineError::Csv(error.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|error| PipelineError::Csv(error.to_string()))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn row_index(&self, week: CalendarWeek) -> Option<usize> {
        let key = week.to_string();
        self.rows
            .iter()
            .position(|row| row[self.week_index].trim() == key)
    }

    /// Cell of `column` in the row of `week`.
    pub fn value(&self, week: CalendarWeek, column: &str) -> Option<&str> {
        let column = self.column(column)?;
        let row = self.row_index(week)?;
        Some(self.rows[row][column].as_str())
    }

    /// Stored demand of `week`, if that row exists and has one.
    pub fn demand(&self, week: CalendarWeek) -> Option<&str> {
        let row = self.row_index(week)?;
        let value = self.rows[row][self.demand_index].trim();
        (!value.is_empty()).then_some(value)
    }

    /// Insert `row` at its week's position, replacing a row of the same week.
    /// Returns true when a row was replaced.
    fn upsert(&mut self, week: CalendarWeek, row: Vec<String>) -> bool {
        if let Some(index) = self.row_index(week) {
            self.rows[index] = row;
            return true;
        }
        // YYYY-WW keys sort chronologically as strings.
        let key = week.to_string();
        let index = self
            .rows
            .iter()
            .position(|existing| existing[self.week_index].trim() > key.as_str())
            .unwrap_or(self.rows.len());
        self.rows.insert(index, row);
        false
    }
}

/// Result of applying one weekly summary.
#[derive(Debug, Clone)]
pub struct WeeklyUpdate {
    pub category: Category,
    /// Week the summary reported on.
    pub reported_week: CalendarWeek,
    /// Week whose row was written.
    pub target_week: CalendarWeek,
    /// Whether the reported week's demand was written back.
    pub backfilled: bool,
    /// Whether a row for the target week already existed and was replaced.
    pub replaced: bool,
    pub table: DatasetTable,
    /// The target week's row, in `table` column order.
    pub next_row: Vec<String>,
}

impl WeeklyUpdate {
    /// Cell of the target week's row.
    pub fn value(&self, column: &str) -> Option<&str> {
        let index = self.table.column(column)?;
        self.next_row.get(index).map(String::as_str)
    }
}

/// Apply `summary` to the stored dataset of `category`.
///
/// A reported week that is not in the dataset is not created; only its
/// successor's row is written. Applying the same summary twice leaves the
/// dataset as after the first application.
pub fn apply_weekly_summary(
    category: Category,
    mut table: DatasetTable,
    summary: &WeeklySummary,
) -> Result<WeeklyUpdate> {
    summary.validate()?;
    let reported_week = summary.week();
    let target_week = reported_week.plus_weeks(1).ok_or_else(|| {
        PipelineError::Dataset(format!("week {reported_week} has no successor"))
    })?;

    let backfilled = match table.row_index(reported_week) {
        Some(index) => {
            table.rows[index][table.demand_index] = summary.demand.to_string();
            true
        }
        None => {
            warn!(
                category = category.label(),
                week = %reported_week,
                "reported week not in dataset; demand not backfilled"
            );
            false
        }
    };

    let mut next_row = next_week_row(&table, summary, target_week);
    // A target week that already closed keeps its recorded demand.
    if let Some(recorded) = table.demand(target_week) {
        next_row[table.demand_index] = recorded.to_string();
    }
    let replaced = table.upsert(target_week, next_row.clone());
    info!(
        category = category.label(),
        reported_week = %reported_week,
        target_week = %target_week,
        backfilled,
        replaced,
        rows = table.len(),
        "weekly update applied"
    );

    Ok(WeeklyUpdate {
        category,
        reported_week,
        target_week,
        backfilled,
        replaced,
        table,
        next_row,
    })
}

fn next_week_row(table: &DatasetTable, summary: &WeeklySummary, target: CalendarWeek) -> Vec<String> {
    let indicators = summary.indicators();
    let stay_column = format!("{LENGTH_OF_STAY_COLUMN}_lag1");

    table
        .headers
        .iter()
        .map(|header| {
            if header == WEEK_COLUMN {
                return target.to_string();
            }
            if header == WEEK_NUMBER_COLUMN {
                return target.week().to_string();
            }
            if header == &stay_column {
                return format_numeric(summary.mean_length_of_stay);
            }
            if let Some(offset) = demand_lag_offset(header) {
                if offset == 1 {
                    return summary.demand.to_string();
                }
                return target
                    .minus_weeks(offset)
                    .and_then(|week| table.demand(week))
                    .unwrap_or_default()
                    .to_string();
            }
            if let Some(indicator) = header.strip_suffix("_lag1").and_then(|base| {
                Indicator::ALL
                    .into_iter()
                    .find(|indicator| indicator.column_name() == base)
            }) {
                return format_numeric(indicators.get(indicator));
            }
            // Demand is unknown until the week closes; service shares are
            // not part of a summary.
            debug!(column = %header, "left empty in next week row");
            String::new()
        })
        .collect()
}

fn demand_lag_offset(header: &str) -> Option<u32> {
    header.strip_prefix(DEMAND_LAG_PREFIX)?.parse().ok()
}

/// Prediction rows of several updates as one CSV, with the category label in
/// a leading `complejidad` column. Columns are the union of the datasets'
/// columns in first-seen order; cells a dataset lacks are left empty.
pub fn predictions_to_csv(updates: &[WeeklyUpdate]) -> Result<Vec<u8>> {
    let mut columns: Vec<&str> = Vec::new();
    for update in updates {
        for header in update.table.headers() {
            if !columns.contains(&header.as_str()) {
                columns.push(header.as_str());
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header_row = vec![CATEGORY_COLUMN];
    header_row.extend(columns.iter().copied());
    writer
        .write_record(&header_row)
        .map_err(|error| PipelineError::Csv(error.to_string()))?;

    for update in updates {
        let mut record = vec![update.category.label()];
        record.extend(
            columns
                .iter()
                .map(|column| update.value(column).unwrap_or_default()),
        );
        writer
            .write_record(&record)
            .map_err(|error| PipelineError::Csv(error.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|error| PipelineError::Csv(error.to_string()))
}
