//! Tests for workbook structure validation.

use std::io::Write;

use census_ingest::{
    ADMISSION_DATE_COLUMN, ADMISSION_TYPE_COLUMN, LENGTH_OF_STAY_COLUMN, LOOKUP_CATEGORY_COLUMN,
    LOOKUP_SERVICE_COLUMN, PATIENT_TYPE_COLUMN, RawDataset, SERVICE_CODE_COLUMN, SchemaError,
    Sheet, read_workbook, validate,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn patient_sheet(headers: &[&str]) -> Sheet {
    Sheet::new(
        "Pacientes",
        strings(headers),
        vec![strings(&["101", "2021-01-04 08:00:00", "3", "Qx", "Urgente"])],
    )
}

fn all_patient_headers() -> Vec<&'static str> {
    vec![
        SERVICE_CODE_COLUMN,
        ADMISSION_DATE_COLUMN,
        LENGTH_OF_STAY_COLUMN,
        PATIENT_TYPE_COLUMN,
        ADMISSION_TYPE_COLUMN,
    ]
}

fn lookup_sheet() -> Sheet {
    Sheet::new(
        "Servicios",
        strings(&[LOOKUP_SERVICE_COLUMN, LOOKUP_CATEGORY_COLUMN]),
        vec![strings(&["101", "Alta"])],
    )
}

fn unused_sheet() -> Sheet {
    Sheet::new("Resumen", strings(&["x"]), vec![])
}

#[test]
fn two_sheets_report_missing_sheet_2() {
    let raw = RawDataset::from_sheets(vec![patient_sheet(&all_patient_headers()), unused_sheet()]);
    let error = validate(raw).unwrap_err();
    assert_eq!(error, SchemaError::MissingSheet { index: 2, found: 2 });
    assert!(error.to_string().starts_with("missing sheet 2"));
}

#[test]
fn missing_patient_column_is_named() {
    let headers: Vec<&str> = all_patient_headers()
        .into_iter()
        .filter(|h| *h != LENGTH_OF_STAY_COLUMN)
        .collect();
    let raw =
        RawDataset::from_sheets(vec![patient_sheet(&headers), unused_sheet(), lookup_sheet()]);
    match validate(raw).unwrap_err() {
        SchemaError::MissingColumn { sheet, column, .. } => {
            assert_eq!(sheet, 0);
            assert_eq!(column, LENGTH_OF_STAY_COLUMN);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_lookup_column_is_named() {
    let lookup = Sheet::new("Servicios", strings(&["UO trat."]), vec![]);
    let raw = RawDataset::from_sheets(vec![
        patient_sheet(&all_patient_headers()),
        unused_sheet(),
        lookup,
    ]);
    match validate(raw).unwrap_err() {
        SchemaError::MissingColumn {
            sheet,
            sheet_name,
            column,
        } => {
            assert_eq!(sheet, 2);
            assert_eq!(sheet_name, "Servicios");
            assert_eq!(column, LOOKUP_CATEGORY_COLUMN);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn extra_columns_and_messy_headers_are_accepted() {
    let mut headers: Vec<String> = all_patient_headers()
        .into_iter()
        .rev()
        .map(|h| format!("  {}  ", h.replace(' ', "   ")))
        .collect();
    headers.push("Observaciones".to_string());
    let patients = Sheet::new("Pacientes", headers, vec![]);
    let raw = RawDataset::from_sheets(vec![patients, unused_sheet(), lookup_sheet()]);
    let validated = validate(raw).unwrap();
    assert_eq!(validated.patient_columns.admission_type, 0);
    assert_eq!(validated.patient_columns.service_code, 4);
    assert_eq!(validated.lookup().rows().len(), 1);
}

#[test]
fn header_case_is_ignored() {
    let headers: Vec<String> = all_patient_headers()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    let patients = Sheet::new("Pacientes", headers, vec![]);
    let lookup = Sheet::new(
        "Servicios",
        strings(&["uo TRAT.", "COMPLEJIDAD"]),
        vec![strings(&["101", "Alta"])],
    );
    let validated =
        validate(RawDataset::from_sheets(vec![patients, unused_sheet(), lookup])).unwrap();
    assert_eq!(validated.patient_columns.patient_type, 3);
    assert_eq!(validated.lookup_columns.category, 1);
}

#[test]
fn non_workbook_file_fails_to_open() {
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    file.write_all(b"plain text").unwrap();
    assert!(read_workbook(file.path()).is_err());
}
