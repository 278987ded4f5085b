//! Per-category outcomes and the run report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::options::PipelineOptions;
use crate::week::CalendarWeek;

/// Classification of one category after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryOutcome {
    /// A dataset was produced.
    Processed { rows: usize, columns: usize },
    /// Too few weeks, or no week with every lag available.
    InsufficientHistory { weeks: usize, rows: usize },
    /// No patient record joined to this category.
    InsufficientColumns,
    /// Building the dataset failed for this category only.
    Failed { message: String },
}

impl CategoryOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, CategoryOutcome::Processed { .. })
    }

    /// Short status keyword used in summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryOutcome::Processed { .. } => "processed",
            CategoryOutcome::InsufficientHistory { .. } => "insufficient_history",
            CategoryOutcome::InsufficientColumns => "insufficient_columns",
            CategoryOutcome::Failed { .. } => "failed",
        }
    }
}

/// Result of processing one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub display_name: String,
    pub outcome: CategoryOutcome,
    /// Weeks left after the demand floor.
    pub weeks: usize,
    pub weeks_below_floor: usize,
    pub first_week: Option<CalendarWeek>,
    pub last_week: Option<CalendarWeek>,
    pub processed_at: DateTime<Utc>,
}

impl CategoryResult {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// Row-level counters collected while normalizing the patient sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub records_read: usize,
    pub records_processed: usize,
    pub date_parse_failures: usize,
    /// Bad length of stay, patient type or admission type.
    pub invalid_rows: usize,
    pub unmapped_service_records: usize,
    pub unknown_category_records: usize,
    pub unknown_category_names: Vec<String>,
    pub lookup_conflicts: usize,
    pub pruned_service_codes: usize,
}

impl RunStatistics {
    pub fn records_dropped(&self) -> usize {
        self.records_read.saturating_sub(self.records_processed)
    }
}

/// Everything a run produced apart from the datasets themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    /// Hex SHA-256 of the source workbook, when known.
    pub source_fingerprint: Option<String>,
    pub options: PipelineOptions,
    pub statistics: RunStatistics,
    /// Keyed by category label.
    pub categories: BTreeMap<String, CategoryResult>,
}

impl RunReport {
    pub fn processed_count(&self) -> usize {
        self.categories
            .values()
            .filter(|result| result.outcome.is_processed())
            .count()
    }

    pub fn result(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.get(category.label())
    }
}
