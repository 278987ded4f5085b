//! Configuration options for dataset generation.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Default lag offsets, in weeks.
pub const DEFAULT_LAG_OFFSETS: [u32; 6] = [1, 2, 3, 4, 10, 52];

/// Options controlling a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Weeks subtracted to build `demanda_lagN` columns. Must include 1.
    pub lag_offsets: Vec<u32>,

    /// Minimum number of aggregated weeks before a category is usable.
    ///
    /// The largest default lag is 52 weeks, so fewer weeks than this can
    /// never produce a meaningful dataset.
    pub min_weeks: usize,

    /// Weeks below this demand are dropped for categories with a floor.
    pub min_weekly_demand: u32,

    /// Service codes seen fewer times than this across the patient sheet are
    /// pruned before encoding.
    pub min_service_records: usize,

    /// Append `servicio_<code>_lag1` columns after `numero_semana`.
    pub include_service_columns: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            lag_offsets: DEFAULT_LAG_OFFSETS.to_vec(),
            min_weeks: 55,
            min_weekly_demand: 10,
            min_service_records: 25,
            include_service_columns: false,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_weeks(mut self, min_weeks: usize) -> Self {
        self.min_weeks = min_weeks;
        self
    }

    pub fn with_min_weekly_demand(mut self, demand: u32) -> Self {
        self.min_weekly_demand = demand;
        self
    }

    pub fn with_min_service_records(mut self, records: usize) -> Self {
        self.min_service_records = records;
        self
    }

    pub fn with_service_columns(mut self, enable: bool) -> Self {
        self.include_service_columns = enable;
        self
    }

    pub fn with_lag_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.lag_offsets = offsets;
        self
    }

    /// Reject option combinations the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.lag_offsets.is_empty() {
            return Err(OptionsError::NoLagOffsets);
        }
        let ordered = self.lag_offsets.first().is_some_and(|first| *first > 0)
            && self.lag_offsets.windows(2).all(|pair| pair[0] < pair[1]);
        if !ordered {
            return Err(OptionsError::UnorderedLagOffsets(self.lag_offsets.clone()));
        }
        if !self.lag_offsets.contains(&1) {
            return Err(OptionsError::MissingLagOne);
        }
        if self.min_weeks == 0 {
            return Err(OptionsError::ZeroMinWeeks);
        }
        Ok(())
    }
}
