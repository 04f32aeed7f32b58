//! Scatter-map layer input.
//!
//! Only records with two parsed coordinates reach the map. Everything else
//! stays in the dataset for the non-geographic aggregates.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use velo_dash_accident_models::{AccidentRecord, Attribute, Label};

/// RGB color used for severity codes outside `1..=4`.
pub const UNKNOWN_SEVERITY_COLOR: [u8; 3] = [128, 128, 128];

/// One point of the accident scatter layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Severity label of the person involved.
    pub severity: Label,
    /// Marker color as RGB.
    pub color: [u8; 3],
}

/// Marker color for a raw severity code.
#[must_use]
pub const fn severity_color(code: Option<i32>) -> [u8; 3] {
    match code {
        Some(1) => [255, 0, 0],
        Some(2) => [0, 255, 0],
        Some(3) => [0, 0, 255],
        Some(4) => [255, 255, 0],
        _ => UNKNOWN_SEVERITY_COLOR,
    }
}

/// Builds map points for every record with a usable position.
#[must_use]
pub fn map_points<'a>(records: impl IntoIterator<Item = &'a AccidentRecord>) -> Vec<MapPoint> {
    records
        .into_iter()
        .filter_map(|record| {
            let (latitude, longitude) = record.position()?;
            Some(MapPoint {
                latitude,
                longitude,
                severity: record.effective_label(Attribute::Severity),
                color: severity_color(record.severity_code),
            })
        })
        .collect()
}

/// Converts map points into a `GeoJSON` feature collection of `Point`s.
///
/// Each feature carries its `severity`, `color` and marker `radius` (meters)
/// as properties.
#[must_use]
pub fn feature_collection(points: &[MapPoint], radius: f64) -> FeatureCollection {
    let features = points
        .iter()
        .map(|point| {
            let mut properties = JsonObject::new();
            properties.insert("severity".to_owned(), point.severity.as_str().into());
            properties.insert("color".to_owned(), serde_json::json!(point.color));
            properties.insert("radius".to_owned(), radius.into());

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(vec![
                    point.longitude,
                    point.latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use velo_dash_accident_models::Coordinate;

    use crate::aggregate::group_count;
    use crate::recode::{coerce_coordinates, recode_all};

    use super::*;

    fn record(lat: &str, lon: &str, grav: i32) -> AccidentRecord {
        AccidentRecord {
            latitude: Coordinate::Unparsed(lat.to_owned()),
            longitude: Coordinate::Unparsed(lon.to_owned()),
            severity_code: Some(grav),
            sex_code: Some(1),
            ..AccidentRecord::default()
        }
    }

    #[test]
    fn malformed_coordinates_leave_the_map_only() {
        let data = recode_all(coerce_coordinates(vec![
            record("48.85", "2.35", 2),
            record("abc", "2.35", 3),
        ]));

        assert!(data[1].latitude.is_missing());

        let points = map_points(&data);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].severity, Label::Known("Tué"));
        assert_eq!(points[0].color, [0, 255, 0]);

        let counts = group_count(&data, Attribute::Severity);
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().any(|c| c.label == Label::Known("Blessé hospitalisé")));
        assert_eq!(group_count(&data, Attribute::Sex)[0].count, 2);
    }

    #[test]
    fn unknown_severity_is_grey() {
        assert_eq!(severity_color(Some(7)), UNKNOWN_SEVERITY_COLOR);
        assert_eq!(severity_color(None), UNKNOWN_SEVERITY_COLOR);
        assert_eq!(severity_color(Some(4)),[255, 255, 0]);
    }

    #[test]
    fn geojson_uses_lon_lat_order() {
        let points = vec![MapPoint {
            latitude: 48.85,
            longitude: 2.35,
            severity: Label::Known("Indemne"),
            color: [255, 0, 0],
        }];
        let collection = feature_collection(&points, 1000.0);
        assert_eq!(collection.features.len(), 1);

        let json = serde_json::to_value(&collection).unwrap();
        let feature = &json["features"][0];
        assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([2.35, 48.85]));
        assert_eq!(feature["properties"]["severity"], "Indemne");
        assert_eq!(feature["properties"]["color"], serde_json::json!([255, 0, 0]));
        assert_eq!(feature["properties"]["radius"], 1000.0);
    }
}
