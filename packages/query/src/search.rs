//! Free-text search over city and state/province names.

use diaspora_map_demographics_models::LocationRecord;

/// Whether the record's city or state contains `query`, ignoring case.
///
/// An empty query matches every record.
#[must_use]
pub fn matches_search(record: &LocationRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    contains_folded(&record.city, &needle) || contains_folded(&record.state, &needle)
}

/// Returns the records matching `query`, in input order.
#[must_use]
pub fn search<'a, I>(records: I, query: &str) -> Vec<&'a LocationRecord>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    if query.is_empty() {
        return records.into_iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| {
            contains_folded(&record.city, &needle) || contains_folded(&record.state, &needle)
        })
        .collect()
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
