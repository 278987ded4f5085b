//! JSON run report.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use census_model::RunReport;

use crate::error::{Result, StoreError};

pub const REPORT_FILE_NAME: &str = "pipeline_report.json";

const REPORT_SCHEMA: &str = "census.pipeline-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct RunReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Render the report as pretty JSON with a schema header.
pub fn run_report_json(report: &RunReport) -> Result<String> {
    let payload = RunReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        report,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Write `pipeline_report.json` into `output_dir`, creating it if needed.
pub fn write_run_report_json(output_dir: &Path, report: &RunReport) -> Result<PathBuf> {
    let output_path = output_dir.join(REPORT_FILE_NAME);
    write_run_report_json_to(&output_path, report)?;
    Ok(output_path)
}

/// Write the report to an explicit path.
pub fn write_run_report_json_to(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = run_report_json(report)?;
    fs::write(path, format!("{json}\n")).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
