#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` encoding of location records for the map surface.
//!
//! Each record becomes one `Point` feature at `[longitude, latitude]` with a
//! flat property bag. The nested `communities` and `pointsOfInterest`
//! collections are embedded as JSON arrays rather than stringified, so
//! [`decode`] restores exactly what [`encode`] was given, order included.

mod decode;
mod encode;

pub use decode::{decode, decode_feature, from_geojson_string};
pub use encode::{encode, encode_record, to_geojson_string};
use thiserror::Error;

/// Property keys written on every feature.
pub mod keys {
    /// Record identifier.
    pub const ID: &str = "id";
    /// City name.
    pub const CITY: &str = "city";
    /// State or province name.
    pub const STATE: &str = "state";
    /// Country code.
    pub const COUNTRY: &str = "country";
    /// Indian population.
    pub const INDIAN_POPULATION: &str = "indianPopulation";
    /// Total population.
    pub const TOTAL_POPULATION: &str = "totalPopulation";
    /// Derived Indian share in percent. Display only; ignored on decode.
    pub const PERCENT_INDIAN: &str = "percentIndian";
    /// Community tags.
    pub const COMMUNITIES: &str = "communities";
    /// Point of interest tallies.
    pub const POINTS_OF_INTEREST: &str = "pointsOfInterest";
}

/// Errors that can occur while decoding features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature has no geometry.
    #[error("Feature {index} has no geometry")]
    MissingGeometry {
        /// Position of the feature in its collection.
        index: usize,
    },

    /// A feature's geometry is not a `Point`.
    #[error("Feature {index} has a {kind} geometry, expected Point")]
    NotAPoint {
        /// Position of the feature in its collection.
        index: usize,
        /// The `GeoJSON` type that was found.
        kind: &'static str,
    },

    /// A point has fewer than two coordinates.
    #[error("Feature {index} has a malformed position")]
    InvalidPosition {
        /// Position of the feature in its collection.
        index: usize,
    },

    /// A feature has no property bag.
    #[error("Feature {index} has no properties")]
    MissingProperties {
        /// Position of the feature in its collection.
        index: usize,
    },

    /// The property bag does not describe a location record.
    #[error("Feature {index} has invalid properties: {source}")]
    Properties {
        /// Position of the feature in its collection.
        index: usize,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_dataset_round_trips() {
        let dataset = diaspora_map_demographics::embedded();
        let collection = encode(dataset);
        let decoded = decode(&collection).unwrap();
        assert_eq!(decoded.as_slice(), dataset.records());
    }

    #[test]
    fn round_trips_through_a_string() {
        let dataset = diaspora_map_demographics::embedded();
        let json = to_geojson_string(&encode(dataset)).unwrap();
        let decoded = decode(&from_geojson_string(&json).unwrap()).unwrap();
        assert_eq!(decoded.as_slice(), dataset.records());
    }

    #[test]
    fn empty_input_round_trips() {
        let collection = encode(std::iter::empty());
        assert!(collection.features.is_empty());
        assert!(collection.bbox.is_none());
        assert!(decode(&collection).unwrap().is_empty());
    }
}
