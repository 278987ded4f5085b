use std::collections::BTreeMap;
use std::path::PathBuf;

use census_model::RunReport;
use census_output::StoredDataset;
use census_transform::WeeklyUpdate;

/// Everything `process` produced, for the summary printer.
#[derive(Debug)]
pub struct ProcessResult {
    pub workbook: PathBuf,
    /// `None` on dry runs.
    pub output_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub report: RunReport,
    /// Stored datasets keyed by category label.
    pub stored: BTreeMap<String, StoredDataset>,
    pub has_errors: bool,
}

/// Everything `update` produced, for the summary printer.
#[derive(Debug)]
pub struct UpdateResult {
    /// `None` on dry runs.
    pub predictions_path: Option<PathBuf>,
    pub updates: Vec<WeeklyUpdate>,
}
