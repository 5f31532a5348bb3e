#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location record types and demographic taxonomies.
//!
//! This crate defines the canonical shape of a city-level demographic
//! record and the closed vocabularies (countries, community tags, point of
//! interest categories) shared by the dataset, the query engine, the
//! feature encoder, and the view layer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Country a location belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Country {
    /// United States
    Us,
    /// Canada
    Ca,
}

impl Country {
    /// Returns the name shown next to a state or province (e.g. "USA").
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Us => "USA",
            Self::Ca => "Canada",
        }
    }

    /// Returns the label used for the region group of this country.
    #[must_use]
    pub const fn region_label(self) -> &'static str {
        match self {
            Self::Us => "US States",
            Self::Ca => "Canadian Provinces",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Us, Self::Ca]
    }
}

/// Linguistic/regional community tag attached to a location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Community {
    /// Punjabi
    Punjabi,
    /// Gujarati
    Gujarati,
    /// Tamil
    Tamil,
    /// Telugu
    Telugu,
    /// Bengali
    Bengali,
    /// Marathi
    Marathi,
    /// Kannada
    Kannada,
    /// Malayalam
    Malayalam,
    /// Hindi-speaking
    #[serde(rename = "Hindi-speaking")]
    #[strum(serialize = "Hindi-speaking")]
    HindiSpeaking,
    /// Mixed / no dominant community
    Mixed,
}

impl Community {
    /// Returns all variants of this enum, in sidebar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Punjabi,
            Self::Gujarati,
            Self::Tamil,
            Self::Telugu,
            Self::Bengali,
            Self::Marathi,
            Self::Kannada,
            Self::Malayalam,
            Self::HindiSpeaking,
            Self::Mixed,
        ]
    }
}

/// Category of a point of interest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PoiCategory {
    /// Temples and gurdwaras
    Temple,
    /// Grocery stores
    Grocery,
    /// Restaurants
    Restaurant,
    /// Cultural centers
    CulturalCenter,
    /// Community organizations
    CommunityOrg,
}

impl PoiCategory {
    /// Returns the filter label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temple => "Hindu Temples",
            Self::Grocery => "Indian Grocery",
            Self::Restaurant => "Indian Restaurants",
            Self::CulturalCenter => "Cultural Centers",
            Self::CommunityOrg => "Community Orgs",
        }
    }

    /// Returns the pictogram shown next to this category.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Temple => "🛕",
            Self::Grocery => "🛒",
            Self::Restaurant => "🍛",
            Self::CulturalCenter => "🎭",
            Self::CommunityOrg => "👥",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Temple,
            Self::Grocery,
            Self::Restaurant,
            Self::CulturalCenter,
            Self::CommunityOrg,
        ]
    }
}

/// A tally of points of interest of one category in a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Display name (e.g. "Temples", "Gurdwaras").
    pub name: String,
    /// Category of the points of interest.
    #[serde(rename = "type")]
    pub category: PoiCategory,
    /// Number of points of interest.
    pub count: u32,
}

/// A city-level demographic entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Unique identifier (e.g. `"us-sanjose"`).
    pub id: String,
    /// City name.
    pub city: String,
    /// Full state or province name.
    pub state: String,
    /// Country.
    pub country: Country,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Residents of Indian origin.
    pub indian_population: u64,
    /// Total residents.
    pub total_population: u64,
    /// Major communities, without duplicates.
    #[serde(default)]
    pub communities: Vec<Community>,
    /// Points of interest tallies.
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

impl LocationRecord {
    /// Share of the total population that is of Indian origin, in percent.
    ///
    /// Always derived from the two population fields. Returns `0.0` when
    /// the total population is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_indian(&self) -> f64 {
        if self.total_population == 0 {
            return 0.0;
        }
        self.indian_population as f64 / self.total_population as f64 * 100.0
    }

    /// Sum of all point of interest counts in this location.
    #[must_use]
    pub fn total_points_of_interest(&self) -> u64 {
        self.points_of_interest
            .iter()
            .map(|poi| u64::from(poi.count))
            .sum()
    }

    /// Whether this location is tagged with any of the given communities.
    #[must_use]
    pub fn has_any_community<'a>(&self, communities: impl IntoIterator<Item = &'a Community>) -> bool {
        communities
            .into_iter()
            .any(|community| self.communities.contains(community))
    }
}
