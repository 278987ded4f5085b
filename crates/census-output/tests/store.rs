//! Tests for local dataset storage and the run report.

use std::collections::BTreeMap;

use chrono::Utc;

use census_model::{PipelineOptions, RunReport, RunStatistics};
use census_output::{
    DatasetStore, LocalDirStore, REPORT_FILE_NAME, StoreError, write_run_report_json,
    write_run_report_json_to,
};

const DATASET: &str = "semana_año,demanda_pacientes\n2022-01,10\n2022-02,12\n";

fn empty_report() -> RunReport {
    RunReport {
        generated_at: Utc::now(),
        source_fingerprint: Some("abc123".to_string()),
        options: PipelineOptions::default(),
        statistics: RunStatistics {
            records_read: 5,
            records_processed: 4,
            date_parse_failures: 1,
            ..RunStatistics::default()
        },
        categories: BTreeMap::new(),
    }
}

#[test]
fn local_store_writes_label_named_csv() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDirStore::new(dir.path().join("data"));

    let stored = store.write("IntePediatrico", DATASET.as_bytes()).unwrap();
    let path = dir.path().join("data").join("IntePediatrico.csv");
    assert_eq!(stored.location, path.display().to_string());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), DATASET);

    let status = store.read_status("IntePediatrico").unwrap();
    assert!(status.exists);
    assert_eq!(status.row_count, 2);
    assert_eq!(status.last_week.as_deref(), Some("2022-02"));
}

#[test]
fn local_store_reports_missing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDirStore::new(dir.path());
    let status = store.read_status("Maternidad").unwrap();
    assert!(!status.exists);
    assert_eq!(status.row_count, 0);
    assert_eq!(store.read("Maternidad").unwrap(), None);
}

#[test]
fn local_store_reads_back_what_it_wrote() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDirStore::new(dir.path());
    store.write("Alta", DATASET.as_bytes()).unwrap();
    assert_eq!(
        store.read("Alta").unwrap().as_deref(),
        Some(DATASET.as_bytes())
    );
    assert!(matches!(
        store.read("../Alta"),
        Err(StoreError::InvalidLabel(_))
    ));
}

#[test]
fn local_store_rejects_unknown_labels() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalDirStore::new(dir.path());
    for label in ["../escape", "Oncologia", "Pediatría"] {
        assert!(
            matches!(
                store.write(label, DATASET.as_bytes()),
                Err(StoreError::InvalidLabel(_))
            ),
            "label {label} should be rejected"
        );
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn run_report_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_run_report_json(dir.path(), &empty_report()).unwrap();
    assert_eq!(path, dir.path().join(REPORT_FILE_NAME));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["schema"], "census.pipeline-report");
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["source_fingerprint"], "abc123");
    assert_eq!(value["statistics"]["date_parse_failures"], 1);
    assert_eq!(value["options"]["min_weeks"], 55);
}

#[test]
fn run_report_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("report.json");
    write_run_report_json_to(&path, &empty_report()).unwrap();
    assert!(path.exists());
}
