pub mod dataset;
pub mod error;
pub mod validate;
pub mod values;
pub mod workbook;

pub use dataset::{RawDataset, Sheet, normalize_header};
pub use error::{IngestError, Result, SchemaError};
pub use validate::{
    ADMISSION_DATE_COLUMN, ADMISSION_TYPE_COLUMN, LENGTH_OF_STAY_COLUMN, LOOKUP_CATEGORY_COLUMN,
    LOOKUP_SERVICE_COLUMN, LookupColumns, PATIENT_TYPE_COLUMN, PatientColumns,
    SERVICE_CODE_COLUMN, ValidatedDataset, validate,
};
pub use values::{excel_serial_to_datetime, format_datetime, format_numeric, parse_f64};
pub use workbook::{fingerprint, read_workbook, read_workbook_bytes};
