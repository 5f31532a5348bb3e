//! Text presentation of records and statistics.

use diaspora_map_demographics_models::{Community, LocationRecord, PoiCategory};
use diaspora_map_query_models::SummaryStats;
use serde::Serialize;

/// Shown in place of an average when there is nothing to average.
pub const NO_VALUE: &str = "–";

/// Formats an integer with comma thousands separators: `1,030,000`.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a percentage to one decimal place: `18.9%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats an optional average percentage, [`NO_VALUE`] when absent.
#[must_use]
pub fn format_average(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), format_percent)
}

/// Formats a population in millions to one decimal place: `2.5M`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_millions(value: u64) -> String {
    format!("{:.1}M", value as f64 / 1_000_000.0)
}

/// `"California, USA"`.
#[must_use]
pub fn region_line(record: &LocationRecord) -> String {
    format!("{}, {}", record.state, record.country.display_name())
}

/// One point of interest tile in the detail card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiTile {
    /// Category icon.
    pub icon: &'static str,
    /// Formatted count.
    pub count: String,
    /// Pluralized category, e.g. `Temples`.
    pub label: String,
}

/// Everything the detail panel shows for a selected record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailCard {
    /// City name.
    pub title: String,
    /// State/province and country.
    pub subtitle: String,
    /// Formatted Indian population.
    pub indian_population: String,
    /// Formatted Indian share.
    pub percent_indian: String,
    /// Formatted total population.
    pub total_population: String,
    /// Community badges.
    pub communities: Vec<String>,
    /// Point of interest tiles, in record order.
    pub points_of_interest: Vec<PoiTile>,
}

impl From<&LocationRecord> for DetailCard {
    fn from(record: &LocationRecord) -> Self {
        Self {
            title: record.city.clone(),
            subtitle: region_line(record),
            indian_population: format_count(record.indian_population),
            percent_indian: format_percent(record.percent_indian()),
            total_population: format_count(record.total_population),
            communities: record.communities.iter().map(Community::to_string).collect(),
            points_of_interest: record
                .points_of_interest
                .iter()
                .map(|poi| PoiTile {
                    icon: poi.category.icon(),
                    count: format_count(u64::from(poi.count)),
                    label: plural_label(poi.category).to_string(),
                })
                .collect(),
        }
    }
}

const fn plural_label(category: PoiCategory) -> &'static str {
    match category {
        PoiCategory::Temple => "Temples",
        PoiCategory::Grocery => "Groceries",
        PoiCategory::Restaurant => "Restaurants",
        PoiCategory::CulturalCenter => "Cultural centers",
        PoiCategory::CommunityOrg => "Community orgs",
    }
}

/// Tooltip shown while hovering a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverCard {
    /// `"City, State"`.
    pub location: String,
    /// Formatted Indian population.
    pub population: String,
    /// Formatted Indian share.
    pub density: String,
}

impl From<&LocationRecord> for HoverCard {
    fn from(record: &LocationRecord) -> Self {
        Self {
            location: format!("{}, {}", record.city, record.state),
            population: format_count(record.indian_population),
            density: format_percent(record.percent_indian()),
        }
    }
}

/// One row of the search dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRow {
    /// Record id to pass back when picked.
    pub id: String,
    /// City name.
    pub city: String,
    /// State/province and country.
    pub region: String,
    /// Formatted Indian population.
    pub population: String,
}

impl From<&LocationRecord> for SuggestionRow {
    fn from(record: &LocationRecord) -> Self {
        Self {
            id: record.id.clone(),
            city: record.city.clone(),
            region: region_line(record),
            population: format_count(record.indian_population),
        }
    }
}

/// Sidebar statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBar {
    /// Total Indian population in millions.
    pub total_population: String,
    /// Number of cities.
    pub cities: String,
    /// Average Indian share, or [`NO_VALUE`].
    pub average_percent: String,
    /// Total points of interest.
    pub points_of_interest: String,
}

impl From<&SummaryStats> for StatsBar {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            total_population: format_millions(stats.total_indian_population),
            cities: stats.record_count.to_string(),
            average_percent: format_average(stats.average_percent_indian),
            points_of_interest: format_count(stats.total_points_of_interest),
        }
    }
}

/// The two-handle population range slider, in thousands.
pub struct PopulationSlider;

impl PopulationSlider {
    /// Lowest handle position.
    pub const MIN: u64 = 0;
    /// Highest handle position; means "no upper bound".
    pub const MAX: u64 = 300;
    /// Handle step.
    pub const STEP: u64 = 10;

    /// Converts handle positions to population bounds.
    ///
    /// Positions are snapped to the step and clamped. The bottom position
    /// means no lower bound and the top position means no upper bound.
    #[must_use]
    pub fn bounds(low: u64, high: u64) -> (Option<u64>, Option<u64>) {
        let snap = |v: u64| (v.min(Self::MAX) / Self::STEP) * Self::STEP;
        let (low, high) = (snap(low), snap(high));
        let min = (low > Self::MIN).then_some(low * 1_000);
        let max = (high < Self::MAX).then_some(high * 1_000);
        (min, max)
    }

    /// Labels for the current bounds: `("0", "300K+")`, `("50K", "200K")`.
    #[must_use]
    pub fn labels(min: Option<u64>, max: Option<u64>) -> (String, String) {
        let thousands = |v: u64| format!("{}K", v.saturating_add(500) / 1_000);
        (
            min.filter(|&v| v > 0)
                .map_or_else(|| "0".to_string(), thousands),
            max.map_or_else(|| format!("{}K+", Self::MAX), thousands),
        )
    }
}
