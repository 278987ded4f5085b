//! Pipeline orchestration.
//!
//! 1. Validates options and the workbook structure (fatal on failure)
//! 2. Normalizes and joins patient records
//! 3. For each discovered category, in parallel: aggregates weeks, builds lag
//!    rows, gates on history and builds the output frame
//! 4. Collects per-category results into a [`RunReport`]

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{Span, debug, info, info_span, warn};

use census_ingest::{RawDataset, validate};
use census_model::{
    Category, CategoryOutcome, CategoryResult, EncodedRecord, PipelineOptions, RunReport,
};

use crate::aggregate::aggregate_category;
use crate::error::Result;
use crate::frame::{CategoryDataset, DatasetSchema, build_frame};
use crate::gate::SufficiencyGate;
use crate::lag::LagFeatureBuilder;
use crate::normalize::normalize;

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: RunReport,
    /// Datasets of processed categories, in category table order.
    pub datasets: Vec<CategoryDataset>,
}

impl PipelineRun {
    pub fn dataset(&self, category: Category) -> Option<&CategoryDataset> {
        self.datasets
            .iter()
            .find(|dataset| dataset.category == category)
    }
}

/// Run the full pipeline over an ingested workbook.
pub fn run(raw: RawDataset, options: &PipelineOptions) -> Result<PipelineRun> {
    let run_span = info_span!("pipeline", sheets = raw.sheet_count());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    options.validate()?;
    let validated = validate(raw)?;
    let normalized = info_span!("normalize").in_scope(|| normalize(&validated, options));

    let mut partitions: BTreeMap<Category, Vec<EncodedRecord>> = normalized
        .categories
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();
    for record in normalized.records {
        partitions.entry(record.category).or_default().push(record);
    }
    let retained: Vec<String> = normalized.retained_service_codes.into_iter().collect();

    let outcomes: Vec<(CategoryResult, Option<CategoryDataset>)> = partitions
        .into_par_iter()
        .map(|(category, records)| {
            process_category(&run_span, category, &records, options, &retained)
        })
        .collect();

    let mut categories = BTreeMap::new();
    let mut datasets = Vec::new();
    for (result, dataset) in outcomes {
        if let Some(dataset) = dataset {
            datasets.push(dataset);
        }
        categories.insert(result.label().to_string(), result);
    }
    datasets.sort_by_key(|dataset| dataset.category);

    let report = RunReport {
        generated_at: Utc::now(),
        source_fingerprint: None,
        options: options.clone(),
        statistics: normalized.statistics,
        categories,
    };
    info!(
        categories = report.categories.len(),
        processed = report.processed_count(),
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineRun { report, datasets })
}

/// Aggregate, lag, gate and frame one category.
///
/// Runs on a rayon worker, where the caller's entered span is not current, so
/// the run span is passed in as an explicit parent.
fn process_category(
    run_span: &Span,
    category: Category,
    records: &[EncodedRecord],
    options: &PipelineOptions,
    retained_service_codes: &[String],
) -> (CategoryResult, Option<CategoryDataset>) {
    let span = info_span!(parent: run_span, "category", category = category.label());
    let _guard = span.enter();

    let series = aggregate_category(category, records, options);
    let lagged = LagFeatureBuilder::from_options(options).build(&series);

    let service_codes: Vec<String> = retained_service_codes
        .iter()
        .filter(|code| {
            series
                .weeks
                .values()
                .any(|row| row.service_mix.contains_key(code.as_str()))
        })
        .cloned()
        .collect();
    let schema = DatasetSchema::for_options(options, &service_codes);

    let mut outcome =
        SufficiencyGate::from_options(options).classify(&series, &lagged, schema.column_count());
    let mut dataset = None;
    if outcome.is_processed() {
        match build_frame(&lagged, &schema) {
            Ok(frame) => dataset = Some(CategoryDataset::new(category, frame)),
            Err(error) => {
                warn!(error = %error, "dataset frame failed");
                outcome = CategoryOutcome::Failed {
                    message: error.to_string(),
                };
            }
        }
    }

    match &outcome {
        CategoryOutcome::Processed { rows, columns } => {
            info!(rows, columns, weeks = series.len(), "category processed");
        }
        other => {
            debug!(
                status = other.as_str(),
                weeks = series.len(),
                records = series.source_records,
                "category skipped"
            );
        }
    }

    let result = CategoryResult {
        category,
        display_name: category.display_name().to_string(),
        outcome,
        weeks: series.len(),
        weeks_below_floor: series.weeks_below_floor,
        first_week: series.first_week(),
        last_week: series.last_week(),
        processed_at: Utc::now(),
    };
    (result, dataset)
}
