use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading a workbook into a [`crate::RawDataset`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook contains no sheets")]
    EmptyWorkbook,
}

/// Structural problems found before any record is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing sheet {index}: the workbook has only {found} sheet(s)")]
    MissingSheet { index: usize, found: usize },

    #[error("sheet {sheet} ('{sheet_name}') is missing required column '{column}'")]
    MissingColumn {
        sheet: usize,
        sheet_name: String,
        column: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
