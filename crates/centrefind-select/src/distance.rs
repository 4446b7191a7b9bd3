//! Ellipsoidal distances on the WGS-84 model.

use centrefind_core::QueryPoint;
use geo::{Distance, Geodesic, Point};

pub const METERS_PER_MILE: f64 = 1_609.344;

/// Geodesic distance in statute miles between a query point and a coordinate.
///
/// Uses Karney's algorithm on the WGS-84 ellipsoid, so results agree with
/// map tooling rather than a spherical approximation.
#[must_use]
pub fn geodesic_miles(from: QueryPoint, latitude: f64, longitude: f64) -> f64 {
    // geo points are (x = longitude, y = latitude).
    let origin = Point::new(from.longitude, from.latitude);
    let destination = Point::new(longitude, latitude);
    Geodesic.distance(origin, destination) / METERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = QueryPoint::new(51.5074, -0.1278);
        assert!(geodesic_miles(p, 51.5074, -0.1278).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_at_equator_is_ellipsoidal() {
        // 110_574.4 m on WGS-84; a sphere would give ~69.09 miles.
        let d = geodesic_miles(QueryPoint::new(0.0, 0.0), 1.0, 0.0);
        assert!((d - 68.708).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // 111_319.5 m along the equator.
        let d = geodesic_miles(QueryPoint::new(0.0, 0.0), 0.0, 1.0);
        assert!((d - 69.171).abs() < 0.01, "got {d}");
    }

    #[test]
    fn london_to_paris_is_about_214_miles() {
        let d = geodesic_miles(QueryPoint::new(51.5074, -0.1278), 48.8566, 2.3522);
        assert!(d > 212.0 && d < 216.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = QueryPoint::new(53.4808, -2.2426);
        let b = QueryPoint::new(55.9533, -3.1883);
        let ab = geodesic_miles(a, b.latitude, b.longitude);
        let ba = geodesic_miles(b, a.latitude, a.longitude);
        assert!((ab - ba).abs() < 1e-6);
    }
}
