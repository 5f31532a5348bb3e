#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query engine over location records.
//!
//! Every function here is pure and total: it takes records in some order
//! and returns the matching records in that same order. There is nothing to
//! cache or invalidate, so callers simply recompute on every change.

pub mod filter;
pub mod search;
pub mod stats;

use diaspora_map_demographics_models::LocationRecord;
use diaspora_map_query_models::FilterCriteria;

pub use filter::{filter, matches, unique_states};
pub use search::{matches_search, search};
pub use stats::summarize;

/// Records passing both the structural filter and the text search.
///
/// The structural filter runs first, then the search narrows its output.
/// An empty `query` applies no text restriction.
#[must_use]
pub fn visible<'a, I>(records: I, criteria: &FilterCriteria, query: &str) -> Vec<&'a LocationRecord>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let filtered = filter(records, criteria);
    let visible = search(filtered, query);
    log::debug!("visible: {} records (query={query:?})", visible.len());
    visible
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use diaspora_map_demographics_models::Country;

    use super::*;
    use crate::filter::tests::springfield_pair;

    #[test]
    fn search_then_filter_scenario() {
        let records = springfield_pair();

        let found = visible(&records, &FilterCriteria::default(), "springfield");
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);

        let criteria = FilterCriteria {
            states: BTreeSet::from(["Missouri".to_string()]),
            ..FilterCriteria::default()
        };
        let found = visible(&records, &criteria, "springfield");
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn empty_query_and_no_criteria_is_everything() {
        let dataset = diaspora_map_demographics::embedded();
        let found = visible(dataset, &FilterCriteria::default(), "");
        assert_eq!(found.len(), dataset.len());
    }

    #[test]
    fn composition_equals_intersection() {
        let dataset = diaspora_map_demographics::embedded();
        let criteria = FilterCriteria {
            countries: BTreeSet::from([Country::Us]),
            ..FilterCriteria::default()
        };

        let composed = visible(dataset, &criteria, "an");
        let filtered = filter(dataset, &criteria);
        let searched = search(dataset, "an");

        let expected: Vec<&str> = dataset
            .records()
            .iter()
            .filter(|r| filtered.iter().any(|f| f.id == r.id))
            .filter(|r| searched.iter().any(|s| s.id == r.id))
            .map(|r| r.id.as_str())
            .collect();
        let actual: Vec<&str> = composed.iter().map(|r| r.id.as_str()).collect();

        assert!(!actual.is_empty());
        assert_eq!(actual, expected);
    }
}
