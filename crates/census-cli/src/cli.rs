//! CLI argument definitions for the ward census pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "census",
    version,
    about = "Ward census datasets - build weekly lagged demand datasets per complexity category",
    long_about = "Build weekly lagged demand datasets from a hospital admissions workbook.\n\n\
                  Admissions are mapped to complexity categories through the service lookup \
                  sheet, aggregated into ISO weeks and written as one CSV per category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level patient values (timestamps, service codes) in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process an admissions workbook into per-category datasets.
    Process(ProcessArgs),

    /// Show the stored dataset of one or every category.
    Status(StatusArgs),

    /// Apply weekly summaries to stored datasets and write prediction rows.
    Update(UpdateArgs),

    /// List the complexity categories.
    Categories,

    /// Resolve a category name to its label and display name.
    Resolve {
        /// Label or display name, case-insensitive.
        #[arg(value_name = "INPUT")]
        input: String,
    },
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Path to the admissions workbook (.xlsx, .xls, .ods).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Directory receiving one CSV per processed category.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data")]
    pub output_dir: PathBuf,

    /// Run the pipeline and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Path of the JSON run report (default: <DIR>/pipeline_report.json).
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Minimum aggregated weeks before a category is processed.
    #[arg(long = "min-weeks", value_name = "N")]
    pub min_weeks: Option<usize>,

    /// Weekly demand below which a week is dropped (floored categories only).
    #[arg(long = "min-weekly-demand", value_name = "N")]
    pub min_weekly_demand: Option<u32>,

    /// Service codes with fewer admissions are left out of service columns.
    #[arg(long = "min-service-records", value_name = "N")]
    pub min_service_records: Option<usize>,

    /// Append lag-1 service mix columns to every dataset.
    #[arg(long = "service-columns")]
    pub service_columns: bool,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Category label or display name (default: every category).
    #[arg(value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Directory holding the stored datasets.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct UpdateArgs {
    /// JSON object mapping category names to last week's summary.
    #[arg(value_name = "SUMMARY_JSON")]
    pub summary: PathBuf,

    /// Directory holding the stored datasets.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data")]
    pub output_dir: PathBuf,

    /// Apply and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Path of the prediction rows CSV (default: <DIR>/predictions.csv).
    #[arg(long = "predictions", value_name = "PATH")]
    pub predictions: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
