//! Record → feature conversion.

use diaspora_map_demographics_models::LocationRecord;
use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};

use crate::{FeatureError, keys};

/// Encodes records as a point [`FeatureCollection`], in input order.
///
/// The collection `bbox` covers every encoded point and is omitted when
/// there are none.
#[must_use]
pub fn encode<'a, I>(records: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let features: Vec<Feature> = records.into_iter().map(encode_record).collect();
    let bbox = compute_bbox(&features);

    log::debug!("Encoded {} features", features.len());

    FeatureCollection {
        bbox,
        features,
        foreign_members: None,
    }
}

/// Encodes a single record as a point [`Feature`].
#[must_use]
pub fn encode_record(record: &LocationRecord) -> Feature {
    let point = geo::Point::new(record.longitude, record.latitude);

    let mut properties = JsonObject::new();
    properties.insert(keys::ID.into(), record.id.clone().into());
    properties.insert(keys::CITY.into(), record.city.clone().into());
    properties.insert(keys::STATE.into(), record.state.clone().into());
    properties.insert(keys::COUNTRY.into(), record.country.as_ref().into());
    properties.insert(
        keys::INDIAN_POPULATION.into(),
        record.indian_population.into(),
    );
    properties.insert(
        keys::TOTAL_POPULATION.into(),
        record.total_population.into(),
    );
    properties.insert(
        keys::PERCENT_INDIAN.into(),
        round_tenth(record.percent_indian()).into(),
    );
    properties.insert(
        keys::COMMUNITIES.into(),
        serde_json::json!(record.communities),
    );
    properties.insert(
        keys::POINTS_OF_INTEREST.into(),
        serde_json::json!(record.points_of_interest),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&point))),
        id: Some(Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Serializes a collection as compact `GeoJSON`.
///
/// # Errors
///
/// Returns [`FeatureError::Json`] if serialization fails.
pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, FeatureError> {
    Ok(serde_json::to_string(collection)?)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn compute_bbox(features: &[Feature]) -> Option<Vec<f64>> {
    let points: Vec<geo::Point<f64>> = features
        .iter()
        .filter_map(|feature| match &feature.geometry.as_ref()?.value {
            geojson::Value::Point(position) if position.len() >= 2 => {
                Some(geo::Point::new(position[0], position[1]))
            }
            _ => None,
        })
        .collect();

    geo::MultiPoint::new(points)
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

#[cfg(test)]
mod tests {
    use diaspora_map_demographics_models::{Community, Country, PoiCategory, PointOfInterest};

    use super::*;

    fn record(id: &str, lon: f64, lat: f64) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            city: "Surrey".to_string(),
            state: "British Columbia".to_string(),
            country: Country::Ca,
            latitude: lat,
            longitude: lon,
            indian_population: 180_000,
            total_population: 570_000,
            communities: vec![Community::Punjabi, Community::HindiSpeaking],
            points_of_interest: vec![PointOfInterest {
                name: "Gurdwaras".to_string(),
                category: PoiCategory::Temple,
                count: 22,
            }],
        }
    }

    #[test]
    fn point_is_longitude_first() {
        let feature = encode_record(&record("ca-surrey", -122.849, 49.1913));
        let geometry = feature.geometry.unwrap();
        assert_eq!(
            geometry.value,
            geojson::Value::Point(vec![-122.849, 49.1913])
        );
        assert_eq!(feature.id, Some(Id::String("ca-surrey".to_string())));
    }

    #[test]
    fn properties_embed_nested_collections() {
        let feature = encode_record(&record("ca-surrey", -122.849, 49.1913));
        let props = feature.properties.unwrap();

        assert_eq!(props[keys::COUNTRY], "CA");
        assert_eq!(props[keys::INDIAN_POPULATION], 180_000);
        assert_eq!(props[keys::PERCENT_INDIAN], 31.6);
        assert_eq!(
            props[keys::COMMUNITIES],
            serde_json::json!(["Punjabi", "Hindi-speaking"])
        );
        assert_eq!(
            props[keys::POINTS_OF_INTEREST],
            serde_json::json!([{"name": "Gurdwaras", "type": "temple", "count": 22}])
        );
    }

    #[test]
    fn bbox_covers_all_points() {
        let records = [
            record("a", -122.0, 49.0),
            record("b", -73.5, 45.5),
            record("c", -97.1, 29.7),
        ];
        let collection = encode(&records);
        assert_eq!(collection.bbox, Some(vec![-122.0, 29.7, -73.5, 49.0]));
        let ids: Vec<_> = collection.features.iter().map(|f| f.id.clone()).collect();
        assert_eq!(
            ids,
            ["a", "b", "c"].map(|id| Some(Id::String(id.to_string())))
        );
    }

    #[test]
    fn serialized_collection_is_geojson() {
        let json = to_geojson_string(&encode(&[record("a", -122.0, 49.0)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
    }
}
