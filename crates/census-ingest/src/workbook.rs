//! Workbook loading through calamine.
//!
//! Every worksheet is read in workbook order. The first non-blank row of each
//! sheet is its header; fully blank rows are skipped. Cells are rendered as
//! text so that validation and parsing work on one representation regardless
//! of the source format.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::dataset::{RawDataset, Sheet};
use crate::error::{IngestError, Result};
use crate::values::{excel_serial_to_datetime, format_datetime, format_numeric};

/// Load an `.xlsx`, `.xlsm`, `.xls`, `.xlsb` or `.ods` workbook from disk.
pub fn read_workbook(path: &Path) -> Result<RawDataset> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_sheets(&mut workbook)?;
    info!(
        path = %path.display(),
        sheets = dataset.sheet_count(),
        "workbook loaded"
    );
    Ok(dataset)
}

/// Load a workbook from uploaded bytes. The format is detected from content.
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<RawDataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let dataset = read_sheets(&mut workbook)?;
    info!(
        bytes = bytes.len(),
        sheets = dataset.sheet_count(),
        "workbook loaded from upload"
    );
    Ok(dataset)
}

/// Hex-encoded SHA-256 of the uploaded workbook.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn read_sheets<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<RawDataset> {
    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| IngestError::Sheet {
                sheet: name.clone(),
                source,
            })?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect::<Vec<String>>())
            .filter(|row| row.iter().any(|cell| !cell.is_empty()));
        let headers = rows.next().unwrap_or_default();
        let data: Vec<Vec<String>> = rows.collect();
        debug!(
            sheet = %name,
            columns = headers.len(),
            rows = data.len(),
            "sheet read"
        );
        sheets.push(Sheet::new(name, headers, data));
    }
    Ok(RawDataset::from_sheets(sheets))
}

/// Render one cell as text.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_numeric(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => excel_serial_to_datetime(value.as_f64())
            .map(format_datetime)
            .unwrap_or_else(|| format_numeric(value.as_f64())),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cell_formats_scalars() {
        assert_eq!(render_cell(&Data::String("  Qx ".into())), "Qx");
        assert_eq!(render_cell(&Data::Float(12.0)), "12");
        assert_eq!(render_cell(&Data::Float(2.5)), "2.5");
        assert_eq!(render_cell(&Data::Int(7)), "7");
        assert_eq!(render_cell(&Data::Bool(true)), "true");
        assert_eq!(render_cell(&Data::Empty), "");
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(read_workbook_bytes(b"not a workbook").is_err());
    }
}
