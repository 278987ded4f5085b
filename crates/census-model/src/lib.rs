pub mod category;
pub mod error;
pub mod options;
pub mod outcome;
pub mod record;
pub mod series;
pub mod summary;
pub mod week;

pub use category::{CATEGORY_TABLE, Category, CategoryEntry, CategoryMapper};
pub use error::{CategoryError, OptionsError, SummaryError, WeekParseError};
pub use options::{DEFAULT_LAG_OFFSETS, PipelineOptions};
pub use outcome::{CategoryOutcome, CategoryResult, RunReport, RunStatistics};
pub use record::{
    AdmissionType, EncodedRecord, Indicator, IndicatorVector, PatientRecord, PatientType,
};
pub use series::{CategoryWeeklySeries, LaggedRow, WeeklyAggregateRow};
pub use summary::WeeklySummary;
pub use week::{CalendarWeek, Season};
