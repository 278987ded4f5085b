use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use census_model::{CalendarWeek, CategoryOutcome, CategoryResult, RunStatistics};

use crate::types::{ProcessResult, UpdateResult};

pub fn print_summary(result: &ProcessResult) {
    println!("Workbook: {}", result.workbook.display());
    if let Some(fingerprint) = &result.report.source_fingerprint {
        println!("SHA-256: {fingerprint}");
    }
    match &result.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Label"),
        header_cell("Status"),
        header_cell("Weeks"),
        header_cell("Below floor"),
        header_cell("First week"),
        header_cell("Last week"),
        header_cell("Rows"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);

    let mut ordered: Vec<&CategoryResult> = result.report.categories.values().collect();
    ordered.sort_by_key(|category| category.category);
    let mut total_rows = 0usize;
    for category in ordered {
        let rows = match &category.outcome {
            CategoryOutcome::Processed { rows, .. } => Some(*rows),
            _ => None,
        };
        total_rows += rows.unwrap_or(0);
        let output = match result.stored.get(category.label()) {
            Some(stored) => Cell::new(&stored.location),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&category.display_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(category.label()),
            status_cell(&category.outcome),
            Cell::new(category.weeks),
            count_cell(category.weeks_below_floor, Color::Yellow),
            week_cell(category.first_week),
            week_cell(category.last_week),
            rows.map_or_else(|| dim_cell("-"), Cell::new),
            output,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(format!("{} processed", result.report.processed_count())),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("{table}");

    print_statistics(&result.report.statistics);
}

pub fn print_update_summary(result: &UpdateResult) {
    match &result.predictions_path {
        Some(path) => println!("Prediction rows: {}", path.display()),
        None => println!("Prediction rows: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Reported week"),
        header_cell("Demand"),
        header_cell("Backfilled"),
        header_cell("Next week"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for update in &result.updates {
        let backfilled = if update.backfilled {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("missing week").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(update.category.display_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(update.reported_week),
            Cell::new(update.value("demanda_lag1").unwrap_or("-")),
            backfilled,
            Cell::new(update.target_week),
            Cell::new(update.table.len()),
        ]);
    }
    println!("{table}");
}

fn print_statistics(statistics: &RunStatistics) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Records"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Read"), Cell::new(statistics.records_read)]);
    table.add_row(vec![
        Cell::new("Processed"),
        Cell::new(statistics.records_processed).fg(Color::Green),
    ]);
    let dropped = [
        ("Unparseable admission date", statistics.date_parse_failures),
        ("Invalid stay or type", statistics.invalid_rows),
        ("Service without category", statistics.unmapped_service_records),
        ("Unknown category", statistics.unknown_category_records),
        ("Conflicting lookup rows", statistics.lookup_conflicts),
        ("Pruned service codes", statistics.pruned_service_codes),
    ];
    for (label, count) in dropped {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Yellow)]);
    }
    println!("{table}");
    if !statistics.unknown_category_names.is_empty() {
        println!(
            "Unknown categories: {}",
            statistics.unknown_category_names.join(", ")
        );
    }
}

fn status_cell(outcome: &CategoryOutcome) -> Cell {
    let cell = Cell::new(outcome.as_str());
    match outcome {
        CategoryOutcome::Processed { .. } => cell.fg(Color::Green),
        CategoryOutcome::InsufficientHistory { .. } | CategoryOutcome::InsufficientColumns => {
            cell.fg(Color::Yellow)
        }
        CategoryOutcome::Failed { .. } => cell.fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

fn week_cell(week: Option<CalendarWeek>) -> Cell {
    match week {
        Some(week) => Cell::new(week),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
