use std::path::PathBuf;

use thiserror::Error;

use census_model::CategoryError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidLabel(#[from] CategoryError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored dataset for {label} is not valid CSV: {message}")]
    Csv { label: String, message: String },

    #[error("failed to serialize run report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
