//! Error types for the census domain model.

use thiserror::Error;

/// Errors raised when external input names a category outside the fixed table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// The input is neither a known label nor a known display name.
    #[error("invalid category: {input}. Valid options: {valid}")]
    InvalidCategory { input: String, valid: String },
}

/// Errors raised when parsing a `YYYY-WW` week identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekParseError {
    #[error("week identifier '{0}' is not in YYYY-WW form")]
    Format(String),

    #[error("week {week} does not exist in ISO year {year}")]
    OutOfRange { year: i32, week: u32 },
}

/// Errors raised by [`crate::PipelineOptions::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("at least one lag offset is required")]
    NoLagOffsets,

    #[error("lag offsets must be positive, strictly increasing and unique: {0:?}")]
    UnorderedLagOffsets(Vec<u32>),

    #[error("lag offsets must include 1 (lag-1 features are part of the output schema)")]
    MissingLagOne,

    #[error("min_weeks must be greater than zero")]
    ZeroMinWeeks,
}

/// Errors raised by [`crate::WeeklySummary::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    #[error("mean length of stay must be a non-negative number, got {0}")]
    InvalidLengthOfStay(f64),

    #[error("summary reports no surgical or non-surgical patients")]
    NoPatientTypes,

    #[error("summary reports no urgent or non-urgent admissions")]
    NoAdmissionTypes,
}
