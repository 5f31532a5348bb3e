//! Structural filtering by country, region, community and population.

use std::collections::BTreeSet;

use diaspora_map_demographics_models::{Country, LocationRecord};
use diaspora_map_query_models::FilterCriteria;

/// Whether a record satisfies every constraint set in `criteria`.
///
/// Constraints are ANDed; values within one constraint are ORed. An empty
/// set or unset bound restricts nothing. `poi_types` is not consulted.
#[must_use]
pub fn matches(record: &LocationRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.countries.is_empty() && !criteria.countries.contains(&record.country) {
        return false;
    }

    if !criteria.states.is_empty() && !criteria.states.contains(&record.state) {
        return false;
    }

    if !criteria.communities.is_empty() && !record.has_any_community(&criteria.communities) {
        return false;
    }

    if criteria
        .min_population
        .is_some_and(|min| record.indian_population < min)
    {
        return false;
    }

    if criteria
        .max_population
        .is_some_and(|max| record.indian_population > max)
    {
        return false;
    }

    true
}

/// Returns the records matching `criteria`, in input order.
///
/// Contradictory bounds (`min > max`) are not rejected; they simply match
/// nothing.
#[must_use]
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a LocationRecord>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    records
        .into_iter()
        .filter(|record| matches(record, criteria))
        .collect()
}

/// Sorted, de-duplicated state/province names, optionally for one country.
#[must_use]
pub fn unique_states<'a, I>(records: I, country: Option<Country>) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    records
        .into_iter()
        .filter(|record| country.is_none_or(|c| record.country == c))
        .map(|record| record.state.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
