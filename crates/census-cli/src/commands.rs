use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info, info_span, warn};

use census_cli::resolve::{resolve_category, status_targets};
use census_cli::weekly::{apply_summaries, parse_summaries};
use census_ingest::{fingerprint, read_workbook_bytes};
use census_model::{Category, CategoryOutcome, PipelineOptions};
use census_output::{
    DatasetStore, LocalDirStore, MemoryStore, write_run_report_json, write_run_report_json_to,
};
use census_transform::{PipelineRun, predictions_to_csv, run};

use crate::cli::{ProcessArgs, StatusArgs, UpdateArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};
use crate::types::{ProcessResult, UpdateResult};

/// Default prediction rows file inside the output directory.
const PREDICTIONS_FILE_NAME: &str = "predictions.csv";

pub fn run_process(args: &ProcessArgs) -> Result<ProcessResult> {
    let process_span = info_span!(
        "process",
        workbook = %args.workbook.display(),
        dry_run = args.dry_run
    );
    let _process_guard = process_span.enter();
    let start = Instant::now();

    let bytes = fs::read(&args.workbook)
        .with_context(|| format!("read workbook {}", args.workbook.display()))?;
    let source_fingerprint = fingerprint(&bytes);
    let raw = info_span!("ingest", bytes = bytes.len())
        .in_scope(|| read_workbook_bytes(&bytes))
        .with_context(|| format!("load workbook {}", args.workbook.display()))?;

    let options = pipeline_options(args);
    let PipelineRun {
        mut report,
        datasets,
    } = run(raw, &options).context("run pipeline")?;
    report.source_fingerprint = Some(source_fingerprint);

    let store: Box<dyn DatasetStore> = if args.dry_run {
        Box::new(MemoryStore::new())
    } else {
        Box::new(LocalDirStore::new(&args.output_dir))
    };
    let mut stored = BTreeMap::new();
    for dataset in &datasets {
        let label = dataset.label();
        let csv = dataset
            .to_csv_bytes()
            .with_context(|| format!("serialize dataset {label}"))?;
        let written = store
            .write(label, &csv)
            .with_context(|| format!("store dataset {label}"))?;
        stored.insert(label.to_string(), written);
    }

    let report_path = if args.dry_run {
        None
    } else if let Some(path) = &args.report {
        write_run_report_json_to(path, &report)
            .with_context(|| format!("write run report {}", path.display()))?;
        Some(path.clone())
    } else {
        let path = write_run_report_json(&args.output_dir, &report)
            .with_context(|| format!("write run report into {}", args.output_dir.display()))?;
        Some(path)
    };

    let has_errors = report
        .categories
        .values()
        .any(|result| matches!(result.outcome, CategoryOutcome::Failed { .. }));
    if has_errors {
        warn!("one or more categories failed");
    }
    info!(
        datasets = stored.len(),
        categories = report.categories.len(),
        duration_ms = start.elapsed().as_millis(),
        "process complete"
    );

    Ok(ProcessResult {
        workbook: args.workbook.clone(),
        output_dir: (!args.dry_run).then(|| args.output_dir.clone()),
        report_path,
        report,
        stored,
        has_errors,
    })
}

/// Defaults overridden by whichever thresholds were given on the command line.
pub fn pipeline_options(args: &ProcessArgs) -> PipelineOptions {
    let mut options = PipelineOptions::default().with_service_columns(args.service_columns);
    if let Some(min_weeks) = args.min_weeks {
        options = options.with_min_weeks(min_weeks);
    }
    if let Some(demand) = args.min_weekly_demand {
        options = options.with_min_weekly_demand(demand);
    }
    if let Some(records) = args.min_service_records {
        options = options.with_min_service_records(records);
    }
    options
}

pub fn run_status(args: &StatusArgs) -> Result<()> {
    let targets = status_targets(args.category.as_deref())?;
    let store = LocalDirStore::new(&args.output_dir);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Label"),
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Last week"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for category in targets {
        let status = store
            .read_status(category.label())
            .with_context(|| format!("read dataset status for {}", category.label()))?;
        let dataset = if status.exists {
            Cell::new(store.dataset_path(category.label())?.display())
        } else {
            dim_cell("missing")
        };
        table.add_row(vec![
            Cell::new(category.display_name()),
            Cell::new(category.label()),
            dataset,
            Cell::new(status.row_count),
            status
                .last_week
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_update(args: &UpdateArgs) -> Result<UpdateResult> {
    let update_span = info_span!(
        "weekly_update",
        summary = %args.summary.display(),
        dry_run = args.dry_run
    );
    let _update_guard = update_span.enter();

    let json = fs::read_to_string(&args.summary)
        .with_context(|| format!("read weekly summary {}", args.summary.display()))?;
    let summaries = parse_summaries(&json)?;
    let store = LocalDirStore::new(&args.output_dir);
    let updates = apply_summaries(&store, &summaries, args.dry_run)?;

    let predictions_path = if args.dry_run {
        None
    } else {
        let path = args
            .predictions
            .clone()
            .unwrap_or_else(|| args.output_dir.join(PREDICTIONS_FILE_NAME));
        let csv = predictions_to_csv(&updates).context("serialize prediction rows")?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, csv)
            .with_context(|| format!("write prediction rows {}", path.display()))?;
        Some(path)
    };
    info!(
        categories = updates.len(),
        backfilled = updates.iter().filter(|update| update.backfilled).count(),
        "weekly update complete"
    );
    Ok(UpdateResult {
        predictions_path,
        updates,
    })
}

pub fn run_categories() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Label", "Display name", "Demand floor"]);
    apply_table_style(&mut table);
    for category in Category::all() {
        let floor = if category.applies_demand_floor() {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![category.label(), category.display_name(), floor]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_resolve(input: &str) -> Result<()> {
    let resolution = resolve_category(input)?;
    println!("{}\t{}", resolution.label, resolution.display_name);
    Ok(())
}
