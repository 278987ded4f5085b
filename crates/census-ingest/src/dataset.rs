/// One worksheet as text: a normalized header row and its data rows.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty strings and extra trailing cells are discarded. [`Sheet::new`] is the
/// only constructor, so indexing a row by a resolved column never goes out of
/// bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet, normalizing headers and cells.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| {
                let mut cells: Vec<String> = row
                    .iter()
                    .take(width)
                    .map(|cell| normalize_cell(cell))
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column by its normalized header, ignoring case.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = normalize_header(header).to_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_lowercase() == wanted)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Ordered sheets of an uploaded workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDataset {
    pub sheets: Vec<Sheet>,
}

impl RawDataset {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

/// Trim, strip a byte-order mark and collapse internal whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn normalize_header_collapses_whitespace_and_bom() {
        assert_eq!(normalize_header("\u{feff} UO   trat. "), "UO trat.");
        assert_eq!(normalize_header("Estancia\t(Días)"), "Estancia (Días)");
    }

    #[test]
    fn rows_are_padded_truncated_and_blank_rows_skipped() {
        let sheet = Sheet::new(
            "lookup",
            strings(&["UO trat.", "Complejidad"]),
            vec![
                strings(&["101"]),
                strings(&["", "  "]),
                strings(&["102", "Alta", "extra"]),
            ],
        );
        assert_eq!(sheet.rows(), &[strings(&["101", ""]), strings(&["102", "Alta"])]);
    }

    #[test]
    fn column_index_matches_normalized_names() {
        let sheet = Sheet::new("s", strings(&["  Tipo de   Paciente"]), vec![]);
        assert_eq!(sheet.column_index("Tipo de Paciente"), Some(0));
        assert_eq!(sheet.column_index("TIPO DE PACIENTE"), Some(0));
        assert_eq!(sheet.column_index("Tipo de Ingreso"), None);
    }
}
