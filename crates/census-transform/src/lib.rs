//! Ward census transformation.
//!
//! - **normalize**: record parsing, service-to-category join, one-hot encoding
//! - **aggregate**: weekly aggregation and the demand floor
//! - **lag**: calendar-aligned lag rows
//! - **gate**: per-category sufficiency classification
//! - **frame**: output schema, Polars frames and CSV encoding
//! - **pipeline**: orchestration across categories
//! - **update**: weekly summaries applied to stored datasets

pub mod aggregate;
pub mod datetime;
pub mod error;
pub mod frame;
pub mod gate;
pub mod lag;
pub mod normalize;
pub mod pipeline;
pub mod redact;
pub mod update;

pub use aggregate::{aggregate, aggregate_category};
pub use datetime::parse_admission_timestamp;
pub use error::{PipelineError, Result};
pub use frame::{CategoryDataset, DatasetSchema, build_frame, service_column_name, to_csv_bytes};
pub use gate::SufficiencyGate;
pub use lag::LagFeatureBuilder;
pub use normalize::{NormalizedDataset, ServiceCategoryMap, normalize};
pub use pipeline::{PipelineRun, run};
pub use update::{
    CATEGORY_COLUMN, DatasetTable, WeeklyUpdate, apply_weekly_summary, predictions_to_csv,
};
