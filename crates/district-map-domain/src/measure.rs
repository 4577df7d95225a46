//! Geodesic area and length of GeoJSON geometry, backed by `geo`.

#[allow(deprecated)]
use geo::{ChamberlainDuquetteArea, HaversineLength};
use geo::{Geometry, LineString};

use crate::error::Result;

/// Convert a GeoJSON geometry into a `geo` geometry.
pub fn to_geo(geometry: &geojson::Geometry) -> Result<Geometry<f64>> {
    Ok(Geometry::<f64>::try_from(geometry.value.clone())?)
}

/// Unsigned area on the sphere in square metres. Lines and points have no area.
pub fn area_m2(geometry: &geojson::Geometry) -> Result<f64> {
    let geometry = to_geo(geometry)?;
    Ok(geometry.chamberlain_duquette_unsigned_area())
}

/// Haversine length in metres of the line parts of a geometry.
#[allow(deprecated)]
pub fn length_m(geometry: &geojson::Geometry) -> Result<f64> {
    let geometry = to_geo(geometry)?;
    Ok(line_length(&geometry))
}

#[allow(deprecated)]
fn line_length(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Line(line) => LineString::from(vec![line.start, line.end]).haversine_length(),
        Geometry::LineString(line) => line.haversine_length(),
        Geometry::MultiLineString(lines) => lines.haversine_length(),
        Geometry::Polygon(polygon) => polygon.exterior().haversine_length(),
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .map(|polygon| polygon.exterior().haversine_length())
            .sum(),
        Geometry::GeometryCollection(collection) => collection.iter().map(line_length).sum(),
        Geometry::Point(_) | Geometry::MultiPoint(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            0.0
        }
    }
}

/// Round to three decimals, half away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(value: serde_json::Value) -> geojson::Geometry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_one_degree_of_equator() {
        let line = geometry(serde_json::json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 0.0]]
        }));

        let length = length_m(&line).unwrap();
        assert!((length - 111_195.08).abs() < 1.0, "length was {length}");
    }

    #[test]
    fn test_small_square_area() {
        // Roughly 100 m x 100 m at the equator
        let side = 100.0 / 111_195.08;
        let square = geometry(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [side, 0.0], [side, side], [0.0, side], [0.0, 0.0]]]
        }));

        let area = area_m2(&square).unwrap();
        assert!((area - 10_000.0).abs() < 50.0, "area was {area}");
    }

    #[test]
    fn test_points_have_no_area_or_length() {
        let point = geometry(serde_json::json!({ "type": "Point", "coordinates": [8.5, 47.3] }));
        assert_eq!(area_m2(&point).unwrap(), 0.0);
        assert_eq!(length_m(&point).unwrap(), 0.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.234_56), 1.235);
        assert_eq!(round3(-2.000_4), -2.0);
        assert_eq!(round3(10.0), 10.0);
    }

    #[test]
    fn test_multi_line_length_is_sum() {
        let multi = geometry(serde_json::json!({
            "type": "MultiLineString",
            "coordinates": [
                [[0.0, 0.0], [1.0, 0.0]],
                [[0.0, 1.0], [0.0, 2.0]]
            ]
        }));
        let single = geometry(serde_json::json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 0.0]]
        }));

        let total = length_m(&multi).unwrap();
        let one = length_m(&single).unwrap();
        assert!((total - 2.0 * one).abs() < 1.0);
    }
}
