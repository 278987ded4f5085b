//! Structural validation of a raw admission workbook.
//!
//! Sheet 0 holds one row per admission and sheet 2 maps service codes to
//! complexity categories. Sheet 1 is not used.

use tracing::info;

use crate::dataset::{RawDataset, Sheet};
use crate::error::SchemaError;

pub const PATIENT_SHEET: usize = 0;
pub const LOOKUP_SHEET: usize = 2;

pub const SERVICE_CODE_COLUMN: &str = "Servicio Ingreso (Código)";
pub const ADMISSION_DATE_COLUMN: &str = "Fecha Ingreso Completa";
pub const LENGTH_OF_STAY_COLUMN: &str = "Estancia (Días)";
pub const PATIENT_TYPE_COLUMN: &str = "Tipo de Paciente";
pub const ADMISSION_TYPE_COLUMN: &str = "Tipo de Ingreso";

pub const LOOKUP_SERVICE_COLUMN: &str = "UO trat.";
pub const LOOKUP_CATEGORY_COLUMN: &str = "Complejidad";

/// Resolved column positions of the patient sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientColumns {
    pub service_code: usize,
    pub admission_date: usize,
    pub length_of_stay: usize,
    pub patient_type: usize,
    pub admission_type: usize,
}

/// Resolved column positions of the lookup sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupColumns {
    pub service_code: usize,
    pub category: usize,
}

/// A dataset whose required structure has been checked.
///
/// This is the only input the normalizer accepts.
#[derive(Debug, Clone)]
pub struct ValidatedDataset {
    raw: RawDataset,
    pub patient_columns: PatientColumns,
    pub lookup_columns: LookupColumns,
}

impl ValidatedDataset {
    pub fn patients(&self) -> &Sheet {
        &self.raw.sheets[PATIENT_SHEET]
    }

    pub fn lookup(&self) -> &Sheet {
        &self.raw.sheets[LOOKUP_SHEET]
    }
}

/// Check sheet count and required columns, in that order.
pub fn validate(raw: RawDataset) -> Result<ValidatedDataset, SchemaError> {
    if raw.sheet_count() <= LOOKUP_SHEET {
        return Err(SchemaError::MissingSheet {
            index: LOOKUP_SHEET,
            found: raw.sheet_count(),
        });
    }

    let patients = &raw.sheets[PATIENT_SHEET];
    let patient_columns = PatientColumns {
        service_code: require(patients, PATIENT_SHEET, SERVICE_CODE_COLUMN)?,
        admission_date: require(patients, PATIENT_SHEET, ADMISSION_DATE_COLUMN)?,
        length_of_stay: require(patients, PATIENT_SHEET, LENGTH_OF_STAY_COLUMN)?,
        patient_type: require(patients, PATIENT_SHEET, PATIENT_TYPE_COLUMN)?,
        admission_type: require(patients, PATIENT_SHEET, ADMISSION_TYPE_COLUMN)?,
    };

    let lookup = &raw.sheets[LOOKUP_SHEET];
    let lookup_columns = LookupColumns {
        service_code: require(lookup, LOOKUP_SHEET, LOOKUP_SERVICE_COLUMN)?,
        category: require(lookup, LOOKUP_SHEET, LOOKUP_CATEGORY_COLUMN)?,
    };

    info!(
        patient_rows = patients.row_count(),
        lookup_rows = lookup.row_count(),
        "dataset structure validated"
    );

    Ok(ValidatedDataset {
        raw,
        patient_columns,
        lookup_columns,
    })
}

fn require(sheet: &Sheet, index: usize, column: &str) -> Result<usize, SchemaError> {
    sheet
        .column_index(column)
        .ok_or_else(|| SchemaError::MissingColumn {
            sheet: index,
            sheet_name: sheet.name().to_string(),
            column: column.to_string(),
        })
}
