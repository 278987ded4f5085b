//! Calendar-aligned lag features.
//!
//! Lags are resolved by week arithmetic, never by position in the series. A
//! missing week therefore removes every row that would have needed it instead
//! of silently shifting older data into its place.

use std::collections::BTreeMap;

use census_model::{CategoryWeeklySeries, LaggedRow, PipelineOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagFeatureBuilder {
    offsets: Vec<u32>,
}

impl LagFeatureBuilder {
    pub fn new(offsets: Vec<u32>) -> Self {
        Self { offsets }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.lag_offsets.clone())
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// One row per week whose every offset resolves to a present week.
    pub fn build(&self, series: &CategoryWeeklySeries) -> Vec<LaggedRow> {
        series
            .weeks
            .iter()
            .filter_map(|(week, current)| {
                let lags = self
                    .offsets
                    .iter()
                    .map(|offset| {
                        let target = week.minus_weeks(*offset)?;
                        series.get(target).map(|row| (*offset, row.clone()))
                    })
                    .collect::<Option<BTreeMap<_, _>>>()?;
                Some(LaggedRow {
                    current: current.clone(),
                    lags,
                })
            })
            .collect()
    }
}

impl Default for LagFeatureBuilder {
    fn default() -> Self {
        Self::from_options(&PipelineOptions::default())
    }
}
