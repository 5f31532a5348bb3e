#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The in-memory demographic dataset.
//!
//! The default dataset is a JSON file baked into the binary at compile time
//! via [`include_str!`] and parsed once into a process-wide, read-only
//! [`Dataset`]. Every load, embedded or from disk, goes through the same
//! validation so that population and coordinate invariants hold for the
//! whole session.

pub mod dataset;

use std::path::Path;
use std::sync::LazyLock;

pub use dataset::Dataset;
use diaspora_map_demographics_models::Community;
use thiserror::Error;

/// Dataset JSON embedded at compile time.
const EMBEDDED_JSON: &str = include_str!("../data/locations.json");

static EMBEDDED: LazyLock<Dataset> = LazyLock::new(|| {
    Dataset::from_json(EMBEDDED_JSON)
        .unwrap_or_else(|e| panic!("Embedded locations.json is invalid: {e}"))
});

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a dataset file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset is not valid JSON for a list of records.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records share the same identifier.
    #[error("Duplicate record id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// A required text field is empty.
    #[error("Record '{id}' has an empty {field}")]
    EmptyField {
        /// Identifier of the offending record.
        id: String,
        /// Name of the empty field.
        field: &'static str,
    },

    /// The Indian population is larger than the total population.
    #[error("Record '{id}' has indianPopulation {indian} > totalPopulation {total}")]
    PopulationExceedsTotal {
        /// Identifier of the offending record.
        id: String,
        /// Stated Indian population.
        indian: u64,
        /// Stated total population.
        total: u64,
    },

    /// Latitude or longitude is outside the WGS84 range.
    #[error("Record '{id}' has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Identifier of the offending record.
        id: String,
        /// Stated latitude.
        latitude: f64,
        /// Stated longitude.
        longitude: f64,
    },

    /// A community tag appears more than once in a record.
    #[error("Record '{id}' lists community {community} more than once")]
    DuplicateCommunity {
        /// Identifier of the offending record.
        id: String,
        /// The repeated community.
        community: Community,
    },
}

/// Returns the dataset embedded in the binary.
///
/// Parsed and validated on first access, then shared for the rest of the
/// process.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or fails validation. The
/// embedded file is checked by this crate's tests.
#[must_use]
pub fn embedded() -> &'static Dataset {
    &EMBEDDED
}

/// Loads a dataset from a JSON file on disk.
///
/// # Errors
///
/// Returns a [`DatasetError`] if the file cannot be read, is not valid
/// JSON, or fails validation.
pub fn load_from_path(path: &Path) -> Result<Dataset, DatasetError> {
    log::info!("Loading dataset from {}", path.display());
    let json = std::fs::read_to_string(path)?;
    Dataset::from_json(&json)
}
