use geo::BooleanOps;
use geo_types::{coord, Coord, LineString, MultiPolygon, Polygon};

const LATITUDE_DEGREE_METERS: f64 = 110574.0;
const LONGITUDE_DEGREE_METERS: f64 = 111320.0;

const CIRCLE_STEPS: usize = 32;

/// Convert a radius in meters to degree offsets at the given latitude.
fn degree_radii(lat: f64, radius_meters: f64) -> (f64, f64) {
    let lat_radius = radius_meters / LATITUDE_DEGREE_METERS;
    let lon_radius = radius_meters / (LONGITUDE_DEGREE_METERS * lat.to_radians().cos());
    (lat_radius, lon_radius)
}

/// Approximate circle of `radius_meters` around a WGS84 coordinate,
/// built in degree space.
pub fn circle(center: Coord, radius_meters: f64) -> Polygon {
    let (lat_radius, lon_radius) = degree_radii(center.y, radius_meters);
    let ring = (0..=CIRCLE_STEPS)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_STEPS as f64);
            coord! {
                x: center.x + lon_radius * theta.cos(),
                y: center.y + lat_radius * theta.sin(),
            }
        })
        .collect::<Vec<Coord>>();
    Polygon::new(LineString::new(ring), vec![])
}

/// Rectangle extending `radius_meters` to each side of the segment `a`→`b`.
/// Returns `None` for zero-length segments.
fn segment_corridor(a: Coord, b: Coord, radius_meters: f64) -> Option<Polygon> {
    let cos_lat = a.y.to_radians().cos();
    // Segment vector in meter space
    let mx = (b.x - a.x) * LONGITUDE_DEGREE_METERS * cos_lat;
    let my = (b.y - a.y) * LATITUDE_DEGREE_METERS;
    let len = mx.hypot(my);
    if len == 0.0 {
        return None;
    }
    // Perpendicular offset, converted back to degrees
    let dx = (-my / len * radius_meters) / (LONGITUDE_DEGREE_METERS * cos_lat);
    let dy = (mx / len * radius_meters) / LATITUDE_DEGREE_METERS;
    Some(Polygon::new(
        LineString::new(vec![
            coord! { x: a.x + dx, y: a.y + dy },
            coord! { x: b.x + dx, y: b.y + dy },
            coord! { x: b.x - dx, y: b.y - dy },
            coord! { x: a.x - dx, y: a.y - dy },
            coord! { x: a.x + dx, y: a.y + dy },
        ]),
        vec![],
    ))
}

/// Buffer a line (as `(lon, lat)` points) by `radius_meters` with round
/// joins: a circle per vertex plus a corridor per segment, unioned.
pub fn buffer_line(points: &[(f64, f64)], radius_meters: f64) -> MultiPolygon {
    let mut pieces: Vec<Polygon> = Vec::new();
    for (lon, lat) in points {
        pieces.push(circle(coord! { x: *lon, y: *lat }, radius_meters));
    }
    for pair in points.windows(2) {
        let a = coord! { x: pair[0].0, y: pair[0].1 };
        let b = coord! { x: pair[1].0, y: pair[1].1 };
        if let Some(corridor) = segment_corridor(a, b, radius_meters) {
            pieces.push(corridor);
        }
    }
    dissolve(pieces.into_iter().map(|p| MultiPolygon::new(vec![p])))
}

/// Union a collection of polygons into one dissolved MultiPolygon.
pub fn dissolve(polygons: impl IntoIterator<Item = MultiPolygon>) -> MultiPolygon {
    let mut iter = polygons.into_iter();
    let Some(first) = iter.next() else {
        return MultiPolygon::new(vec![]);
    };
    iter.fold(first, |acc, next| acc.union(&next))
}
