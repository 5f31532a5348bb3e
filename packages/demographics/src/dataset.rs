//! Validated, immutable collection of [`LocationRecord`]s.

use std::collections::{BTreeMap, BTreeSet};

use diaspora_map_demographics_models::LocationRecord;

use crate::DatasetError;

/// An ordered, validated set of location records with an id index.
///
/// Record order is the order of the source file and is preserved by every
/// query over the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<LocationRecord>,
    by_id: BTreeMap<String, usize>,
}

impl Dataset {
    /// Builds a dataset from records, validating every record.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] for the first record that has a duplicate
    /// id, an empty id/city/state, an Indian population above the total
    /// population, out-of-range coordinates, or a repeated community tag.
    pub fn from_records(records: Vec<LocationRecord>) -> Result<Self, DatasetError> {
        let mut by_id = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            validate_record(record)?;
            if by_id.insert(record.id.clone(), idx).is_some() {
                return Err(DatasetError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }

        log::info!("Loaded {} location records", records.len());

        Ok(Self { records, by_id })
    }

    /// Parses a JSON array of records and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if the input does not parse, or any
    /// validation error from [`Self::from_records`].
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<LocationRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// All records, in source order.
    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Looks up a record by its identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LocationRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LocationRecord;
    type IntoIter = std::slice::Iter<'a, LocationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn validate_record(record: &LocationRecord) -> Result<(), DatasetError> {
    let empty = |field: &'static str| DatasetError::EmptyField {
        id: record.id.clone(),
        field,
    };

    if record.id.trim().is_empty() {
        return Err(empty("id"));
    }
    if record.city.trim().is_empty() {
        return Err(empty("city"));
    }
    if record.state.trim().is_empty() {
        return Err(empty("state"));
    }

    if record.indian_population > record.total_population {
        return Err(DatasetError::PopulationExceedsTotal {
            id: record.id.clone(),
            indian: record.indian_population,
            total: record.total_population,
        });
    }

    if !(-90.0..=90.0).contains(&record.latitude) || !(-180.0..=180.0).contains(&record.longitude)
    {
        return Err(DatasetError::InvalidCoordinates {
            id: record.id.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
        });
    }

    let mut seen = BTreeSet::new();
    for community in &record.communities {
        if !seen.insert(*community) {
            return Err(DatasetError::DuplicateCommunity {
                id: record.id.clone(),
                community: *community,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diaspora_map_demographics_models::{Community, Country};

    fn record(id: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            city: "Springfield".to_string(),
            state: "Illinois".to_string(),
            country: Country::Us,
            latitude: 39.78,
            longitude: -89.65,
            indian_population: 1_000,
            total_population: 114_000,
            communities: vec![Community::Gujarati],
            points_of_interest: vec![],
        }
    }

    #[test]
    fn preserves_source_order_and_indexes_ids() {
        let dataset = Dataset::from_records(vec![record("b"), record("a")]).unwrap();
        let ids: Vec<&str> = dataset.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(dataset.find("a").unwrap().id, "a");
        assert!(dataset.find("c").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Dataset::from_records(vec![record("a"), record("a")]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn rejects_population_above_total() {
        let mut bad = record("a");
        bad.indian_population = bad.total_population + 1;
        let err = Dataset::from_records(vec![bad]).unwrap_err();
        assert!(matches!(err, DatasetError::PopulationExceedsTotal { .. }));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut bad = record("a");
        bad.latitude = 91.0;
        assert!(matches!(
            Dataset::from_records(vec![bad]).unwrap_err(),
            DatasetError::InvalidCoordinates { .. }
        ));

        let mut nan = record("b");
        nan.longitude = f64::NAN;
        assert!(matches!(
            Dataset::from_records(vec![nan]).unwrap_err(),
            DatasetError::InvalidCoordinates { .. }
        ));
    }

    #[test]
    fn rejects_empty_fields() {
        let mut bad = record("a");
        bad.city = "  ".to_string();
        let err = Dataset::from_records(vec![bad]).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyField { field: "city", .. }));
    }

    #[test]
    fn rejects_repeated_communities() {
        let mut bad = record("a");
        bad.communities = vec![Community::Tamil, Community::Tamil];
        let err = Dataset::from_records(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DuplicateCommunity {
                community: Community::Tamil,
                ..
            }
        ));
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"[{
            "id": "a", "city": "Springfield", "state": "Illinois", "country": "US",
            "latitude": 39.78, "longitude": -89.65,
            "indianPopulation": 1000, "totalPopulation": 114000,
            "communities": ["Hindi-speaking"],
            "pointsOfInterest": [{"name": "Temples", "type": "temple", "count": 2}]
        }]"#;
        let dataset = Dataset::from_json(json).unwrap();
        let rec = dataset.find("a").unwrap();
        assert_eq!(rec.communities, vec![Community::HindiSpeaking]);
        assert_eq!(rec.total_points_of_interest(), 2);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Dataset::from_json("{not json").unwrap_err(),
            DatasetError::Json(_)
        ));
    }
}
