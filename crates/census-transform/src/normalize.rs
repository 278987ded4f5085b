//! Record normalization and the service-to-category join.
//!
//! Each patient row is parsed, dated, joined to its complexity category
//! through the lookup sheet and one-hot encoded. Rows that cannot be used are
//! dropped and counted in [`RunStatistics`]; nothing here aborts the run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use census_ingest::{LookupColumns, Sheet, ValidatedDataset, parse_f64};
use census_model::{
    AdmissionType, Category, CategoryMapper, EncodedRecord, IndicatorVector, PatientRecord,
    PatientType, PipelineOptions, RunStatistics,
};

use crate::datetime::parse_admission_timestamp;
use crate::redact::redact_value;

/// Service code to category display name, built from the lookup sheet.
///
/// The first mapping seen for a code wins.
#[derive(Debug, Clone, Default)]
pub struct ServiceCategoryMap {
    entries: HashMap<String, String>,
    conflicts: usize,
}

impl ServiceCategoryMap {
    pub fn from_lookup(sheet: &Sheet, columns: LookupColumns) -> Self {
        let mut map = Self::default();
        for row in sheet.rows() {
            let code = row[columns.service_code].trim();
            let category = row[columns.category].trim();
            if code.is_empty() || category.is_empty() {
                continue;
            }
            map.insert(code, category);
        }
        map
    }

    fn insert(&mut self, code: &str, category: &str) {
        match self.entries.get(code) {
            Some(existing) if existing != category => {
                self.conflicts += 1;
                warn!(
                    service_code = redact_value(code),
                    kept = %existing,
                    ignored = %category,
                    "conflicting category mapping for service code"
                );
            }
            Some(_) => {}
            None => {
                self.entries.insert(code.to_string(), category.to_string());
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    /// Later mappings that disagreed with the first one for the same code.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known categories referenced by at least one mapping.
    pub fn known_categories(&self) -> BTreeSet<Category> {
        self.entries
            .values()
            .filter_map(|name| CategoryMapper::parse_category(name).ok())
            .collect()
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub records: Vec<EncodedRecord>,
    /// Known categories discovered in the lookup sheet.
    pub categories: BTreeSet<Category>,
    /// Service codes frequent enough to keep their own columns.
    pub retained_service_codes: BTreeSet<String>,
    pub statistics: RunStatistics,
}

/// Why a patient row was dropped.
enum RowRejection {
    Date,
    Invalid(&'static str),
}

/// Parse the patient sheet, join it to categories and encode it.
pub fn normalize(dataset: &ValidatedDataset, options: &PipelineOptions) -> NormalizedDataset {
    let lookup = ServiceCategoryMap::from_lookup(dataset.lookup(), dataset.lookup_columns);
    let patients = dataset.patients();
    let service_counts = service_code_counts(patients, dataset);
    let retained: BTreeSet<String> = service_counts
        .iter()
        .filter(|(_, count)| **count >= options.min_service_records)
        .map(|(code, _)| code.clone())
        .collect();

    let mut statistics = RunStatistics {
        records_read: patients.row_count(),
        lookup_conflicts: lookup.conflicts(),
        ..RunStatistics::default()
    };
    let mut unknown_names: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(patients.row_count());

    for (row_index, row) in patients.rows().iter().enumerate() {
        let patient = match parse_patient(row, dataset) {
            Ok(patient) => patient,
            Err(RowRejection::Date) => {
                statistics.date_parse_failures += 1;
                debug!(
                    row = row_index,
                    value = redact_value(&row[dataset.patient_columns.admission_date]),
                    "unparseable admission date"
                );
                continue;
            }
            Err(RowRejection::Invalid(field)) => {
                statistics.invalid_rows += 1;
                debug!(row = row_index, field, "invalid patient row");
                continue;
            }
        };

        let Some(category_name) = lookup.get(&patient.service_code) else {
            statistics.unmapped_service_records += 1;
            debug!(
                row = row_index,
                service_code = redact_value(&patient.service_code),
                "service code missing from lookup"
            );
            continue;
        };
        let Ok(category) = CategoryMapper::parse_category(category_name) else {
            statistics.unknown_category_records += 1;
            if unknown_names.insert(category_name.to_string()) {
                warn!(category = %category_name, "unknown category in lookup sheet");
            }
            continue;
        };

        let service_code = retained
            .contains(&patient.service_code)
            .then(|| patient.service_code.clone());
        records.push(EncodedRecord {
            category,
            week: patient.week(),
            length_of_stay_days: patient.length_of_stay_days,
            indicators: IndicatorVector::one_hot(
                patient.patient_type,
                patient.admission_type,
                patient.season(),
            ),
            service_code,
        });
    }

    statistics.records_processed = records.len();
    statistics.unknown_category_names = unknown_names.into_iter().collect();
    statistics.pruned_service_codes = service_counts.len() - retained.len();

    let categories = lookup.known_categories();
    info!(
        records_read = statistics.records_read,
        records_processed = statistics.records_processed,
        date_parse_failures = statistics.date_parse_failures,
        invalid_rows = statistics.invalid_rows,
        unmapped = statistics.unmapped_service_records,
        unknown_category = statistics.unknown_category_records,
        categories = categories.len(),
        "records normalized"
    );

    NormalizedDataset {
        records,
        categories,
        retained_service_codes: retained,
        statistics,
    }
}

fn parse_patient(row: &[String], dataset: &ValidatedDataset) -> Result<PatientRecord, RowRejection> {
    let columns = dataset.patient_columns;
    let admitted_at =
        parse_admission_timestamp(&row[columns.admission_date]).ok_or(RowRejection::Date)?;
    let length_of_stay_days = parse_f64(&row[columns.length_of_stay])
        .filter(|days| days.is_finite() && *days >= 0.0)
        .ok_or(RowRejection::Invalid("length_of_stay"))?;
    let patient_type = PatientType::parse(&row[columns.patient_type])
        .ok_or(RowRejection::Invalid("patient_type"))?;
    let admission_type = AdmissionType::parse(&row[columns.admission_type])
        .ok_or(RowRejection::Invalid("admission_type"))?;
    Ok(PatientRecord {
        service_code: row[columns.service_code].trim().to_string(),
        admitted_at,
        length_of_stay_days,
        patient_type,
        admission_type,
    })
}

/// Occurrences of each service code across the whole patient sheet.
fn service_code_counts(patients: &Sheet, dataset: &ValidatedDataset) -> BTreeMap<String, usize> {
    let column = dataset.patient_columns.service_code;
    let mut counts = BTreeMap::new();
    for row in patients.rows() {
        let code = row[column].trim();
        if !code.is_empty() {
            *counts.entry(code.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(rows: &[(&str, &str)]) -> Sheet {
        Sheet::new(
            "lookup",
            vec!["UO trat.".to_string(), "Complejidad".to_string()],
            rows.iter()
                .map(|(code, category)| vec![(*code).to_string(), (*category).to_string()])
                .collect(),
        )
    }

    const COLUMNS: LookupColumns = LookupColumns {
        service_code: 0,
        category: 1,
    };

    #[test]
    fn first_mapping_wins_and_conflicts_are_counted() {
        let map = ServiceCategoryMap::from_lookup(
            &lookup(&[("101", "Alta"), ("101", "Media"), ("101", "Alta"), ("102", "Baja")]),
            COLUMNS,
        );
        assert_eq!(map.get("101"), Some("Alta"));
        assert_eq!(map.get(" 102 "), Some("Baja"));
        assert_eq!(map.conflicts(), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn blank_rows_are_skipped_and_unknown_names_not_discovered() {
        let map = ServiceCategoryMap::from_lookup(
            &lookup(&[("", "Alta"), ("103", ""), ("104", "Oncología"), ("105", "neonatología")]),
            COLUMNS,
        );
        assert_eq!(map.len(), 2);
        let discovered: Vec<&str> = map
            .known_categories()
            .into_iter()
            .map(Category::label)
            .collect();
        assert_eq!(discovered, vec!["Neonatologia"]);
    }
}
