//! Weekly summary files and their application to stored datasets.
//!
//! A summary file is a JSON object keyed by category label or display name,
//! each value one [`WeeklySummary`]:
//!
//! ```json
//! { "Alta": { "Fecha ingreso": "2024-01-10", "Demanda pacientes": 32, ... } }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use tracing::info_span;

use census_model::{Category, WeeklySummary};
use census_output::DatasetStore;
use census_transform::{DatasetTable, WeeklyUpdate, apply_weekly_summary};

use crate::resolve::resolve_category;

/// Parse a summary file into summaries in category table order.
pub fn parse_summaries(json: &str) -> Result<Vec<(Category, WeeklySummary)>> {
    let raw: BTreeMap<String, WeeklySummary> =
        serde_json::from_str(json).context("parse weekly summary JSON")?;
    let mut summaries: BTreeMap<Category, WeeklySummary> = BTreeMap::new();
    for (name, summary) in raw {
        let category = resolve_category(&name)?.category;
        if summaries.insert(category, summary).is_some() {
            bail!("category {} is given more than once", category.label());
        }
    }
    if summaries.is_empty() {
        bail!("weekly summary file names no category");
    }
    Ok(summaries.into_iter().collect())
}

/// Apply each summary to its stored dataset. Updated datasets are written
/// back unless `dry_run` is set.
pub fn apply_summaries(
    store: &dyn DatasetStore,
    summaries: &[(Category, WeeklySummary)],
    dry_run: bool,
) -> Result<Vec<WeeklyUpdate>> {
    let mut updates = Vec::with_capacity(summaries.len());
    for (category, summary) in summaries {
        let label = category.label();
        let _guard = info_span!("update", category = label).entered();
        let Some(bytes) = store
            .read(label)
            .with_context(|| format!("read stored dataset {label}"))?
        else {
            bail!("no stored dataset for {label}; run `census process` first");
        };
        let table = DatasetTable::from_csv(&bytes)
            .with_context(|| format!("load stored dataset {label}"))?;
        let update = apply_weekly_summary(*category, table, summary)
            .with_context(|| format!("apply weekly summary to {label}"))?;
        if !dry_run {
            let csv = update
                .table
                .to_csv_bytes()
                .with_context(|| format!("serialize dataset {label}"))?;
            store
                .write(label, &csv)
                .with_context(|| format!("store dataset {label}"))?;
        }
        updates.push(update);
    }
    Ok(updates)
}
