//! Output for ward census datasets: per-category dataset storage and the
//! JSON run report.

pub mod error;
pub mod report;
pub mod store;

pub use error::{Result, StoreError};
pub use report::{
    REPORT_FILE_NAME, run_report_json, write_run_report_json, write_run_report_json_to,
};
pub use store::{
    DatasetStatus, DatasetStore, LocalDirStore, MemoryStore, StoredDataset, status_from_csv,
};
