#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and aggregate result types.
//!
//! [`FilterCriteria`] is the full set of structural constraints a user has
//! chosen. Controls that only change one dimension send a [`CriteriaPatch`]
//! instead, which is merged into the current criteria without touching the
//! fields it leaves unspecified.

use std::collections::BTreeSet;

use diaspora_map_demographics_models::{Community, Country, PoiCategory};
use serde::{Deserialize, Serialize};

/// Structural filter constraints. The default value restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Countries to include (empty = all).
    pub countries: BTreeSet<Country>,
    /// State or province names to include (empty = all).
    pub states: BTreeSet<String>,
    /// Communities, at least one of which must be present (empty = all).
    pub communities: BTreeSet<Community>,
    /// Inclusive lower bound on the Indian population.
    pub min_population: Option<u64>,
    /// Inclusive upper bound on the Indian population.
    pub max_population: Option<u64>,
    /// Point of interest categories chosen in the sidebar.
    ///
    /// Carried with the criteria but not applied by the filter predicate.
    pub poi_types: BTreeSet<PoiCategory>,
}

impl FilterCriteria {
    /// Whether any constraint that the filter predicate applies is set.
    ///
    /// `poi_types` is not considered, since it never narrows the result.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.countries.is_empty()
            || !self.states.is_empty()
            || !self.communities.is_empty()
            || self.min_population.is_some()
            || self.max_population.is_some()
    }

    /// Merges a partial update into these criteria.
    ///
    /// Fields the patch leaves as `None` are unchanged.
    pub fn apply(&mut self, patch: CriteriaPatch) {
        if let Some(countries) = patch.countries {
            self.countries = countries;
        }
        if let Some(states) = patch.states {
            self.states = states;
        }
        if let Some(communities) = patch.communities {
            self.communities = communities;
        }
        if let Some(min) = patch.min_population {
            self.min_population = min;
        }
        if let Some(max) = patch.max_population {
            self.max_population = max;
        }
        if let Some(poi_types) = patch.poi_types {
            self.poi_types = poi_types;
        }
    }

    /// Returns a copy of these criteria with the patch applied.
    #[must_use]
    pub fn merged(&self, patch: CriteriaPatch) -> Self {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }
}

/// A partial update to [`FilterCriteria`].
///
/// `None` leaves the corresponding field unchanged. The population bounds
/// are tri-state: `None` keeps the bound, `Some(None)` clears it and
/// `Some(Some(n))` sets it.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriteriaPatch {
    /// Replacement country set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<BTreeSet<Country>>,
    /// Replacement state/province set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<BTreeSet<String>>,
    /// Replacement community set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communities: Option<BTreeSet<Community>>,
    /// New lower bound, or `Some(None)` to clear it.
    #[serde(with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub min_population: Option<Option<u64>>,
    /// New upper bound, or `Some(None)` to clear it.
    #[serde(with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub max_population: Option<Option<u64>>,
    /// Replacement point of interest category set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poi_types: Option<BTreeSet<PoiCategory>>,
}

impl CriteriaPatch {
    /// A patch that sets both population bounds at once.
    #[must_use]
    pub fn population(min: Option<u64>, max: Option<u64>) -> Self {
        Self {
            min_population: Some(min),
            max_population: Some(max),
            ..Self::default()
        }
    }
}

/// Distinguishes a missing key (unchanged) from an explicit `null` (clear).
mod tri_state {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ref_option, clippy::option_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Option<u64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    #[allow(clippy::option_option)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<u64>>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(Some)
    }
}

/// Aggregate statistics over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Sum of the Indian population of every record.
    pub total_indian_population: u64,
    /// Unweighted mean of each record's Indian share, in percent.
    ///
    /// `None` when there are no records.
    pub average_percent_indian: Option<f64>,
    /// Number of records.
    pub record_count: usize,
    /// Sum of every point of interest count of every record.
    pub total_points_of_interest: u64,
}

impl SummaryStats {
    /// Statistics of an empty set of records.
    pub const EMPTY: Self = Self {
        total_indian_population: 0,
        average_percent_indian: None,
        record_count: 0,
        total_points_of_interest: 0,
    };
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_restrict_nothing() {
        assert!(!FilterCriteria::default().has_active_filters());
    }

    #[test]
    fn poi_types_do_not_count_as_active() {
        let criteria = FilterCriteria {
            poi_types: BTreeSet::from([PoiCategory::Temple]),
            ..FilterCriteria::default()
        };
        assert!(!criteria.has_active_filters());
    }

    #[test]
    fn patch_leaves_unspecified_fields_alone() {
        let mut criteria = FilterCriteria {
            countries: BTreeSet::from([Country::Ca]),
            min_population: Some(10_000),
            ..FilterCriteria::default()
        };

        criteria.apply(CriteriaPatch {
            states: Some(BTreeSet::from(["Ontario".to_string()])),
            ..CriteriaPatch::default()
        });

        assert_eq!(criteria.countries, BTreeSet::from([Country::Ca]));
        assert_eq!(criteria.states, BTreeSet::from(["Ontario".to_string()]));
        assert_eq!(criteria.min_population, Some(10_000));
    }

    #[test]
    fn patch_can_clear_a_bound() {
        let criteria = FilterCriteria {
            min_population: Some(10_000),
            max_population: Some(50_000),
            ..FilterCriteria::default()
        };

        let merged = criteria.merged(CriteriaPatch {
            max_population: Some(None),
            ..CriteriaPatch::default()
        });

        assert_eq!(merged.min_population, Some(10_000));
        assert_eq!(merged.max_population, None);
    }

    #[test]
    fn patch_json_distinguishes_missing_from_null() {
        let patch: CriteriaPatch =
            serde_json::from_str(r#"{"maxPopulation": null, "countries": ["CA"]}"#).unwrap();
        assert_eq!(patch.min_population, None);
        assert_eq!(patch.max_population, Some(None));
        assert_eq!(patch.countries, Some(BTreeSet::from([Country::Ca])));
    }

    #[test]
    fn patch_json_omits_unchanged_fields() {
        let json = serde_json::to_value(CriteriaPatch {
            min_population: Some(None),
            ..CriteriaPatch::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"minPopulation": null}));
    }

    #[test]
    fn criteria_json_uses_camel_case() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"minPopulation": 5000, "communities": ["Tamil"]}"#).unwrap();
        assert_eq!(criteria.min_population, Some(5000));
        assert_eq!(criteria.communities, BTreeSet::from([Community::Tamil]));
        assert!(criteria.states.is_empty());
    }

    #[test]
    fn empty_summary_has_no_average() {
        let stats = SummaryStats::default();
        assert_eq!(stats.average_percent_indian, None);
        assert_eq!(
            serde_json::to_value(&stats).unwrap()["averagePercentIndian"],
            serde_json::Value::Null
        );
    }
}
