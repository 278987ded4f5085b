use census_model::{CategoryOutcome, CategoryWeeklySeries, LaggedRow, PipelineOptions};

/// Decides whether a category has enough history to produce a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SufficiencyGate {
    min_weeks: usize,
}

impl SufficiencyGate {
    pub fn new(min_weeks: usize) -> Self {
        Self { min_weeks }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.min_weeks)
    }

    /// Classify a category. `columns` is the width of the dataset that
    /// would be written when the category is processed.
    pub fn classify(
        &self,
        series: &CategoryWeeklySeries,
        lagged_rows: &[LaggedRow],
        columns: usize,
    ) -> CategoryOutcome {
        if series.source_records == 0 {
            return CategoryOutcome::InsufficientColumns;
        }
        let weeks = series.len();
        if weeks < self.min_weeks || lagged_rows.is_empty() {
            return CategoryOutcome::InsufficientHistory { weeks, rows: 0 };
        }
        CategoryOutcome::Processed {
            rows: lagged_rows.len(),
            columns,
        }
    }
}
