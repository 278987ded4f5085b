//! Dataset storage.
//!
//! Datasets are stored one CSV per category under the category's ASCII
//! label. Labels are checked against the category table before any path is
//! built, so arbitrary input can never address a file outside the store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use census_model::{CategoryError, CategoryMapper};

use crate::error::{Result, StoreError};

/// Column holding the `YYYY-WW` week key in stored datasets.
const WEEK_COLUMN: &str = "semana_año";

/// Where a dataset was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDataset {
    pub label: String,
    /// File path or other backend-specific location.
    pub location: String,
    pub bytes: usize,
}

/// Summary of a stored dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStatus {
    pub exists: bool,
    pub row_count: usize,
    /// Greatest `semana_año` in the dataset.
    pub last_week: Option<String>,
}

/// Storage collaborator for category datasets.
pub trait DatasetStore: Send + Sync {
    /// Store (or replace) the dataset of a category.
    fn write(&self, label: &str, csv_bytes: &[u8]) -> Result<StoredDataset>;

    /// Stored CSV bytes of a category, or `None` when nothing is stored.
    fn read(&self, label: &str) -> Result<Option<Vec<u8>>>;

    /// Describe the stored dataset of a category.
    fn read_status(&self, label: &str) -> Result<DatasetStatus> {
        match self.read(label)? {
            Some(bytes) => status_from_csv(label, &bytes),
            None => Ok(DatasetStatus::default()),
        }
    }
}

fn checked_label(label: &str) -> Result<&str> {
    if CategoryMapper::is_valid_label(label) {
        Ok(label)
    } else {
        Err(StoreError::InvalidLabel(CategoryError::InvalidCategory {
            input: label.to_string(),
            valid: CategoryMapper::all_labels().join(", "),
        }))
    }
}

/// Stores datasets as `<root>/<label>.csv`.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dataset_path(&self, label: &str) -> Result<PathBuf> {
        let label = checked_label(label)?;
        Ok(self.root.join(format!("{label}.csv")))
    }
}

impl DatasetStore for LocalDirStore {
    fn write(&self, label: &str, csv_bytes: &[u8]) -> Result<StoredDataset> {
        let path = self.dataset_path(label)?;
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Write {
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, csv_bytes).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        info!(label, path = %path.display(), bytes = csv_bytes.len(), "dataset written");
        Ok(StoredDataset {
            label: label.to_string(),
            location: path.display().to_string(),
            bytes: csv_bytes.len(),
        })
    }

    fn read(&self, label: &str) -> Result<Option<Vec<u8>>> {
        let path = self.dataset_path(label)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(label, path = %path.display(), "no stored dataset");
                Ok(None)
            }
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }
}

/// Keeps datasets in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetStore for MemoryStore {
    fn write(&self, label: &str, csv_bytes: &[u8]) -> Result<StoredDataset> {
        let label = checked_label(label)?;
        let mut datasets = self.datasets.lock().map_err(|_| StoreError::Poisoned)?;
        datasets.insert(label.to_string(), csv_bytes.to_vec());
        Ok(StoredDataset {
            label: label.to_string(),
            location: format!("memory://{label}"),
            bytes: csv_bytes.len(),
        })
    }

    fn read(&self, label: &str) -> Result<Option<Vec<u8>>> {
        let label = checked_label(label)?;
        let datasets = self.datasets.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(datasets.get(label).cloned())
    }
}

/// Count data rows and find the latest week of a stored CSV dataset.
pub fn status_from_csv(label: &str, bytes: &[u8]) -> Result<DatasetStatus> {
    let csv_error = |message: String| StoreError::Csv {
        label: label.to_string(),
        message,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|error| csv_error(error.to_string()))?
        .clone();
    let week_index = headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == WEEK_COLUMN)
        .ok_or_else(|| csv_error(format!("missing column {WEEK_COLUMN}")))?;

    let mut row_count = 0;
    let mut last_week: Option<String> = None;
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(error.to_string()))?;
        row_count += 1;
        let Some(week) = record.get(week_index).map(str::trim) else {
            continue;
        };
        // YYYY-WW keys sort chronologically as strings.
        if !week.is_empty() && last_week.as_deref().is_none_or(|last| week > last) {
            last_week = Some(week.to_string());
        }
    }
    Ok(DatasetStatus {
        exists: true,
        row_count,
        last_week,
    })
}
