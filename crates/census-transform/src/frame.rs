//! Output dataset frames.
//!
//! A [`CategoryDataset`] wraps the Polars frame written for one category. The
//! column layout is described once by [`DatasetSchema`] so the frame builder,
//! the sufficiency gate and the CSV header all agree on it.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, PlSmallStr, Series};

use census_ingest::format_numeric;
use census_model::{Category, Indicator, LaggedRow, PipelineOptions};

use crate::error::{PipelineError, Result};

pub const WEEK_COLUMN: &str = "semana_año";
pub const DEMAND_COLUMN: &str = "demanda_pacientes";
pub const LENGTH_OF_STAY_COLUMN: &str = "estancia_dias";
pub const WEEK_NUMBER_COLUMN: &str = "numero_semana";

/// Ordered column layout of a category dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    lag_offsets: Vec<u32>,
    service_codes: Vec<String>,
}

impl DatasetSchema {
    /// Schema for the given options. `service_codes` only contributes
    /// columns when service columns are enabled.
    pub fn for_options(options: &PipelineOptions, service_codes: &[String]) -> Self {
        let service_codes = if options.include_service_columns {
            service_codes.to_vec()
        } else {
            Vec::new()
        };
        Self {
            lag_offsets: options.lag_offsets.clone(),
            service_codes,
        }
    }

    pub fn lag_offsets(&self) -> &[u32] {
        &self.lag_offsets
    }

    pub fn service_codes(&self) -> &[String] {
        &self.service_codes
    }

    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![WEEK_COLUMN.to_string(), DEMAND_COLUMN.to_string()];
        names.extend(
            self.lag_offsets
                .iter()
                .map(|offset| format!("demanda_lag{offset}")),
        );
        names.push(format!("{LENGTH_OF_STAY_COLUMN}_lag1"));
        names.extend(
            Indicator::ALL
                .iter()
                .map(|indicator| format!("{}_lag1", indicator.column_name())),
        );
        names.push(WEEK_NUMBER_COLUMN.to_string());
        names.extend(
            self.service_codes
                .iter()
                .map(|code| service_column_name(code)),
        );
        names
    }

    pub fn column_count(&self) -> usize {
        // key, demand, demand lags, stay, indicators, week number, services
        2 + self.lag_offsets.len() + 1 + Indicator::COUNT + 1 + self.service_codes.len()
    }
}

/// Column name for a service-mix feature. Characters outside
/// `[A-Za-z0-9_]` are replaced with `_`.
pub fn service_column_name(code: &str) -> String {
    let sanitized: String = code
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    format!("servicio_{sanitized}_lag1")
}

/// A processed category dataset.
#[derive(Debug, Clone)]
pub struct CategoryDataset {
    pub category: Category,
    pub data: DataFrame,
}

impl CategoryDataset {
    pub fn new(category: Category, data: DataFrame) -> Self {
        Self { category, data }
    }

    /// Storage name of this dataset.
    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        to_csv_bytes(&self.data)
    }
}

/// Build the output frame for `rows`, which must come from a builder whose
/// offsets match `schema`.
pub fn build_frame(rows: &[LaggedRow], schema: &DatasetSchema) -> Result<DataFrame> {
    let names = schema.column_names();
    let mut columns: Vec<Column> = Vec::with_capacity(names.len());
    let mut name_iter = names.into_iter();
    let mut next_name = || {
        name_iter
            .next()
            .ok_or_else(|| PipelineError::Frame("schema ran out of column names".to_string()))
    };

    let weeks: Vec<String> = rows.iter().map(|row| row.week().to_string()).collect();
    columns.push(Series::new(next_name()?.into(), weeks).into_column());

    let demand: Vec<i64> = rows
        .iter()
        .map(|row| i64::from(row.current.demand))
        .collect();
    columns.push(Series::new(next_name()?.into(), demand).into_column());

    for offset in schema.lag_offsets() {
        let values = rows
            .iter()
            .map(|row| {
                row.lag(*offset)
                    .map(|lagged| i64::from(lagged.demand))
                    .ok_or_else(|| missing_lag(row, *offset))
            })
            .collect::<Result<Vec<i64>>>()?;
        columns.push(Series::new(next_name()?.into(), values).into_column());
    }

    let previous = rows
        .iter()
        .map(|row| row.lag(1).ok_or_else(|| missing_lag(row, 1)))
        .collect::<Result<Vec<_>>>()?;

    let stay: Vec<f64> = previous.iter().map(|lag| lag.mean_length_of_stay).collect();
    columns.push(Series::new(next_name()?.into(), stay).into_column());

    for indicator in Indicator::ALL {
        let values: Vec<f64> = previous
            .iter()
            .map(|lag| lag.indicators.get(indicator))
            .collect();
        columns.push(Series::new(next_name()?.into(), values).into_column());
    }

    let week_numbers: Vec<i64> = rows
        .iter()
        .map(|row| i64::from(row.week().week()))
        .collect();
    columns.push(Series::new(next_name()?.into(), week_numbers).into_column());

    for code in schema.service_codes() {
        let values: Vec<f64> = previous.iter().map(|lag| lag.service_share(code)).collect();
        columns.push(Series::new(next_name()?.into(), values).into_column());
    }

    DataFrame::new(columns).map_err(|error| PipelineError::Frame(error.to_string()))
}

fn missing_lag(row: &LaggedRow, offset: u32) -> PipelineError {
    PipelineError::Frame(format!("week {} has no lag {offset} row", row.week()))
}

/// Serialize a frame as CSV with a header row.
pub fn to_csv_bytes(frame: &DataFrame) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<&str> = frame
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    writer
        .write_record(&header)
        .map_err(|error| PipelineError::Csv(error.to_string()))?;

    let columns = frame.get_columns();
    for idx in 0..frame.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer
            .write_record(&record)
            .map_err(|error| PipelineError::Csv(error.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|error| PipelineError::Csv(error.to_string()))
}

fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_has_eighteen_columns() {
        let schema = DatasetSchema::for_options(&PipelineOptions::default(), &[]);
        assert_eq!(schema.column_count(), 18);
        assert_eq!(schema.column_names().len(), 18);
    }

    #[test]
    fn service_columns_require_the_option() {
        let codes = vec!["UEME-CLI".to_string()];
        let off = DatasetSchema::for_options(&PipelineOptions::default(), &codes);
        assert!(off.service_codes().is_empty());
        let on = DatasetSchema::for_options(
            &PipelineOptions::default().with_service_columns(true),
            &codes,
        );
        assert_eq!(on.column_count(), 19);
        assert_eq!(
            on.column_names().last().map(String::as_str),
            Some("servicio_UEME_CLI_lag1")
        );
    }

    #[test]
    fn empty_rows_build_an_empty_frame_with_header() {
        let schema = DatasetSchema::for_options(&PipelineOptions::default(), &[]);
        let frame = build_frame(&[], &schema).unwrap();
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), 18);
        let csv = String::from_utf8(to_csv_bytes(&frame).unwrap()).unwrap();
        assert!(csv.starts_with("semana_año,demanda_pacientes,demanda_lag1,"));
        assert_eq!(csv.lines().count(), 1);
    }
}
