//! Integration test for file logging.
//!
//! The subscriber is process-global, so this binary holds a single test.

use census_cli::logging::{LogConfig, LogFormat, init_logging};
use census_transform::redact::{log_data_enabled, redact_value};
use tracing::level_filters::LevelFilter;

#[test]
fn json_logs_are_written_to_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("census.log");
    let mut config = LogConfig::default()
        .with_level(LevelFilter::INFO)
        .with_format(LogFormat::Json)
        .with_log_file(Some(path.clone()))
        .with_log_data(false);
    config.use_env_filter = false;
    init_logging(&config).unwrap();

    tracing::info!(target: "census_transform", weeks = 68, "category processed");
    tracing::debug!(target: "census_transform", "filtered out at info");
    tracing::info!(target: "calamine", "external crates stay at warn");

    assert!(!log_data_enabled());
    assert_eq!(redact_value("2022-01-03 10:00"), "[REDACTED]");

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 1, "{contents}");
    assert_eq!(lines[0]["fields"]["message"], "category processed");
    assert_eq!(lines[0]["fields"]["weeks"], 68);
    assert_eq!(lines[0]["level"], "INFO");
}
