//! Aggregate statistics for the sidebar stats bar.

use diaspora_map_demographics_models::LocationRecord;
use diaspora_map_query_models::SummaryStats;

/// Aggregates a set of records.
///
/// The average share is the plain mean of each record's percentage, not a
/// population-weighted mean. An empty input yields [`SummaryStats::EMPTY`],
/// whose average is `None`. Totals saturate at `u64::MAX`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut stats = SummaryStats::EMPTY;
    let mut percent_sum = 0.0;

    for record in records {
        stats.total_indian_population = stats
            .total_indian_population
            .saturating_add(record.indian_population);
        stats.total_points_of_interest = stats
            .total_points_of_interest
            .saturating_add(record.total_points_of_interest());
        stats.record_count += 1;
        percent_sum += record.percent_indian();
    }

    if stats.record_count > 0 {
        stats.average_percent_indian = Some(percent_sum / stats.record_count as f64);
    }

    stats
}
