//! Scene footprint resolution.
//!
//! Preference order: a non-null geometry from the USGS STAC record (only when
//! requested), the angle-coefficient corner grid, then the MTL bounding box.
use geo::Area;
use geo::orient::{Direction, Orient};
use geo_types::{Coord, LineString, Polygon};
use geojson::{Geometry, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::projection::utm_to_lon_lat;
use crate::io::href::sibling_href;
use crate::io::{AngMetadata, HrefReader, MtlMetadata};
use crate::types::Sensor;

/// Where a footprint came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootprintSource {
    Usgs,
    AngleFile,
    BoundingBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub geometry: Geometry,
    pub source: FootprintSource,
}

/// Counter-clockwise rectangle over `[west, south, east, north]`.
pub fn bbox_polygon(bbox: &[f64; 4]) -> Polygon<f64> {
    let [w, s, e, n] = *bbox;
    Polygon::new(
        LineString::from(vec![(w, s), (e, s), (e, n), (w, n), (w, s)]),
        vec![],
    )
}

/// Clamped rings covering less than this share of the bbox are slivers.
const MIN_BBOX_COVERAGE: f64 = 0.01;

/// Footprint polygon from the L1T image corners of an angle file, clamped to
/// `bbox`. `None` when the projection is not UTM, the clamped ring has fewer
/// than three distinct vertices, or it covers almost none of the bbox.
pub fn footprint_from_ang(ang: &AngMetadata, bbox: &[f64; 4]) -> Option<Polygon<f64>> {
    if ang.map_projection != "UTM" {
        debug!("Angle file projection {} is not UTM", ang.map_projection);
        return None;
    }
    let zone = ang.utm_zone?;

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(5);
    for [x, y] in ang.projected_corners() {
        let [lon, lat] = utm_to_lon_lat(x, y, zone);
        let coord = Coord {
            x: lon.clamp(bbox[0], bbox[2]),
            y: lat.clamp(bbox[1], bbox[3]),
        };
        if !coords.contains(&coord) {
            coords.push(coord);
        }
    }
    if coords.len() < 3 {
        return None;
    }

    // Polygon::new closes the ring
    let polygon = Polygon::new(LineString::from(coords), vec![]);
    let coverage = polygon.unsigned_area() / bbox_polygon(bbox).unsigned_area();
    if coverage < MIN_BBOX_COVERAGE {
        debug!("Angle footprint covers {:.4} of the bbox", coverage);
        return None;
    }
    Some(polygon.orient(Direction::Default))
}

/// Geometry of the USGS STAC record next to `base`, if one exists and is non-null.
pub fn usgs_geometry(reader: &HrefReader, base: &str, sensor: Sensor) -> Option<Geometry> {
    let suffix = if sensor.has_split_products() {
        "SR_stac.json"
    } else {
        "stac.json"
    };
    let href = sibling_href(base, suffix);
    if !reader.exists(&href) {
        debug!("No USGS STAC record at {}", href);
        return None;
    }
    let text = match reader.read_to_string(&href) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read USGS STAC record {}: {}", href, e);
            return None;
        }
    };
    let record: JsonValue = match serde_json::from_str(&text) {
        Ok(record) => record,
        Err(e) => {
            warn!("Could not parse USGS STAC record {}: {}", href, e);
            return None;
        }
    };
    match record.get("geometry") {
        Some(JsonValue::Null) | None => None,
        Some(geometry) => serde_json::from_value(geometry.clone()).ok(),
    }
}

/// Resolve the footprint of one scene.
///
/// `usgs` is the externally supplied geometry, if the caller asked for it.
/// MSS scenes never read an angle file.
pub fn resolve_footprint(
    reader: &HrefReader,
    base: &str,
    mtl: &MtlMetadata,
    sensor: Sensor,
    usgs: Option<Geometry>,
) -> Footprint {
    if let Some(geometry) = usgs {
        return Footprint {
            geometry,
            source: FootprintSource::Usgs,
        };
    }

    if sensor != Sensor::Mss {
        let ang_href = sibling_href(base, "ANG.txt");
        if reader.exists(&ang_href) {
            match AngMetadata::from_href(reader, &ang_href) {
                Ok(ang) => match footprint_from_ang(&ang, &mtl.bbox) {
                    Some(polygon) => {
                        return Footprint {
                            geometry: Geometry::new(Value::from(&polygon)),
                            source: FootprintSource::AngleFile,
                        };
                    }
                    None => warn!(
                        "Angle file {} gave no usable footprint, using bounding box",
                        ang_href
                    ),
                },
                Err(e) => warn!(
                    "Could not read angle file {} ({}), using bounding box",
                    ang_href, e
                ),
            }
        } else {
            warn!("Angle file {} not found, using bounding box", ang_href);
        }
    }

    Footprint {
        geometry: Geometry::new(Value::from(&bbox_polygon(&mtl.bbox))),
        source: FootprintSource::BoundingBox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains, Point};

    fn ang(projection: &str) -> AngMetadata {
        AngMetadata {
            map_projection: projection.to_string(),
            utm_zone: Some(23),
            ul_corner: [275400.0, 5397000.0],
            pixel_size: 30.0,
            corner_lines: vec![0.0, 300.0, 7230.0, 6930.0],
            corner_samples: vec![900.0, 8140.0, 7240.0, 0.0],
        }
    }

    const BBOX: [f64; 4] = [-48.05, 46.74, -44.73, 48.73];

    #[test]
    fn ang_footprint_lies_within_bbox_and_is_ccw() {
        let polygon = footprint_from_ang(&ang("UTM"), &BBOX).unwrap();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!(polygon.signed_area() > 0.0);
        let outer = bbox_polygon(&BBOX);
        for coord in polygon.exterior().coords() {
            assert!(coord.x >= BBOX[0] && coord.x <= BBOX[2]);
            assert!(coord.y >= BBOX[1] && coord.y <= BBOX[3]);
        }
        assert!(outer.contains(&Point::new(-46.4, 47.7)));
        assert!(polygon.contains(&Point::new(-46.4, 47.7)));
    }

    #[test]
    fn ang_footprint_is_deterministic() {
        assert_eq!(
            footprint_from_ang(&ang("UTM"), &BBOX),
            footprint_from_ang(&ang("UTM"), &BBOX)
        );
    }

    #[test]
    fn polar_stereographic_is_rejected() {
        assert!(footprint_from_ang(&ang("PS"), &BBOX).is_none());
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        // a bbox far away clamps every corner onto the same point
        let far = [10.0, 10.0, 11.0, 11.0];
        assert!(footprint_from_ang(&ang("UTM"), &far).is_none());
    }

    fn equatorial_ang() -> AngMetadata {
        AngMetadata {
            map_projection: "UTM".into(),
            utm_zone: Some(23),
            ul_corner: [400000.0, 50000.0],
            pixel_size: 30.0,
            corner_lines: vec![0.0, 0.0, 6666.0, 6666.0],
            corner_samples: vec![0.0, 6666.0, 6666.0, 0.0],
        }
    }

    #[test]
    fn scene_across_equator_keeps_its_north_edge() {
        let bbox = [-45.899, -1.3568, -44.1013, 0.4524];
        let polygon = footprint_from_ang(&equatorial_ang(), &bbox).unwrap();
        let ys: Vec<f64> = polygon.exterior().coords().map(|c| c.y).collect();
        assert!(ys.iter().any(|y| *y > 0.45), "{:?}", ys);
        assert!(ys.iter().any(|y| *y < -1.35), "{:?}", ys);
        assert!(polygon.unsigned_area() > 0.9 * bbox_polygon(&bbox).unsigned_area());
        assert!(polygon.signed_area() > 0.0);
    }

    #[test]
    fn sliver_after_clamping_is_rejected() {
        // only the southern edge of the scene reaches into this bbox
        let bbox = [-45.899, -5.0, -44.1013, -1.35];
        assert!(footprint_from_ang(&equatorial_ang(), &bbox).is_none());
    }

    #[test]
    fn bbox_polygon_is_closed_rectangle() {
        let polygon = bbox_polygon(&[1.0, 2.0, 3.0, 4.0]);
        let coords: Vec<_> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(
            coords,
            vec![(1.0, 2.0), (3.0, 2.0), (3.0, 4.0), (1.0, 4.0), (1.0, 2.0)]
        );
        assert_eq!(polygon.unsigned_area(), 4.0);
    }
}
