//! Feature → record conversion.

use diaspora_map_demographics_models::{Community, Country, LocationRecord, PointOfInterest};
use geojson::{Feature, FeatureCollection};
use serde::Deserialize;

use crate::FeatureError;

/// Property bag as written by [`crate::encode_record`]. Unknown keys,
/// including the derived `percentIndian`, are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordProperties {
    id: String,
    city: String,
    state: String,
    country: Country,
    indian_population: u64,
    total_population: u64,
    #[serde(default)]
    communities: Vec<Community>,
    #[serde(default)]
    points_of_interest: Vec<PointOfInterest>,
}

/// Decodes every feature of a collection back into records, in order.
///
/// # Errors
///
/// Returns the [`FeatureError`] of the first feature that cannot be
/// decoded.
pub fn decode(collection: &FeatureCollection) -> Result<Vec<LocationRecord>, FeatureError> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| decode_feature(index, feature))
        .collect()
}

/// Decodes one feature. `index` is only used in error messages.
///
/// # Errors
///
/// Returns a [`FeatureError`] if the geometry is missing or not a point, or
/// if the properties do not describe a record.
pub fn decode_feature(index: usize, feature: &Feature) -> Result<LocationRecord, FeatureError> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or(FeatureError::MissingGeometry { index })?;

    let (longitude, latitude) = match &geometry.value {
        geojson::Value::Point(position) => match position.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => return Err(FeatureError::InvalidPosition { index }),
        },
        other => {
            return Err(FeatureError::NotAPoint {
                index,
                kind: geometry_kind(other),
            });
        }
    };

    let properties = feature
        .properties
        .clone()
        .ok_or(FeatureError::MissingProperties { index })?;

    let props: RecordProperties =
        serde_json::from_value(serde_json::Value::Object(properties))
            .map_err(|source| FeatureError::Properties { index, source })?;

    Ok(LocationRecord {
        id: props.id,
        city: props.city,
        state: props.state,
        country: props.country,
        latitude,
        longitude,
        indian_population: props.indian_population,
        total_population: props.total_population,
        communities: props.communities,
        points_of_interest: props.points_of_interest,
    })
}

const fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Parses a `GeoJSON` `FeatureCollection` document.
///
/// # Errors
///
/// Returns [`FeatureError::Json`] if the text is not a feature collection.
pub fn from_geojson_string(json: &str) -> Result<FeatureCollection, FeatureError> {
    Ok(serde_json::from_str(json)?)
}
