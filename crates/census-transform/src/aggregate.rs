//! Weekly aggregation per category.

use std::collections::BTreeMap;

use tracing::debug;

use census_model::{
    CalendarWeek, Category, CategoryWeeklySeries, EncodedRecord, IndicatorVector,
    PipelineOptions, WeeklyAggregateRow,
};

#[derive(Default)]
struct WeekAccumulator {
    count: u32,
    length_of_stay_total: f64,
    indicators: IndicatorVector,
    services: BTreeMap<String, u32>,
}

impl WeekAccumulator {
    fn add(&mut self, record: &EncodedRecord) {
        self.count += 1;
        self.length_of_stay_total += record.length_of_stay_days;
        self.indicators.accumulate(&record.indicators);
        if let Some(code) = &record.service_code {
            *self.services.entry(code.clone()).or_insert(0) += 1;
        }
    }

    fn finish(self, week: CalendarWeek) -> WeeklyAggregateRow {
        let count = f64::from(self.count);
        WeeklyAggregateRow {
            week,
            demand: self.count,
            mean_length_of_stay: self.length_of_stay_total / count,
            indicators: self.indicators.scaled(count),
            service_mix: self
                .services
                .into_iter()
                .map(|(code, n)| (code, f64::from(n) / count))
                .collect(),
        }
    }
}

/// Aggregate every category present in `records`.
pub fn aggregate(
    records: &[EncodedRecord],
    options: &PipelineOptions,
) -> BTreeMap<Category, CategoryWeeklySeries> {
    let mut partitions: BTreeMap<Category, Vec<&EncodedRecord>> = BTreeMap::new();
    for record in records {
        partitions.entry(record.category).or_default().push(record);
    }
    partitions
        .into_iter()
        .map(|(category, records)| {
            (
                category,
                aggregate_category(category, records, options),
            )
        })
        .collect()
}

/// Collapse one category's records into a calendar-keyed weekly series.
///
/// Records of other categories are ignored. Weeks without records never
/// appear. For categories with a demand floor, weeks below
/// `min_weekly_demand` are removed and counted.
pub fn aggregate_category<'a>(
    category: Category,
    records: impl IntoIterator<Item = &'a EncodedRecord>,
    options: &PipelineOptions,
) -> CategoryWeeklySeries {
    let mut series = CategoryWeeklySeries::new(category);
    let mut weeks: BTreeMap<CalendarWeek, WeekAccumulator> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.category == category) {
        series.source_records += 1;
        weeks.entry(record.week).or_default().add(record);
    }

    let floor = category
        .applies_demand_floor()
        .then_some(options.min_weekly_demand);
    for (week, accumulator) in weeks {
        if floor.is_some_and(|minimum| accumulator.count < minimum) {
            series.weeks_below_floor += 1;
            continue;
        }
        series.weeks.insert(week, accumulator.finish(week));
    }

    debug!(
        category = category.label(),
        records = series.source_records,
        weeks = series.len(),
        weeks_below_floor = series.weeks_below_floor,
        "weekly series aggregated"
    );
    series
}
