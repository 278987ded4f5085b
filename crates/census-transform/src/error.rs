use thiserror::Error;

use census_ingest::SchemaError;
use census_model::{OptionsError, SummaryError};

/// Failures that abort a pipeline run, a single category's dataset or a
/// weekly update.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pipeline options: {0}")]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to build dataset frame: {0}")]
    Frame(String),

    #[error("failed to encode dataset as CSV: {0}")]
    Csv(String),

    #[error("invalid weekly summary: {0}")]
    Summary(#[from] SummaryError),

    #[error("stored dataset cannot be updated: {0}")]
    Dataset(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
