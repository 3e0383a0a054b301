//! Spherical coordinate helpers.
//!
//! Geodetic geometries carry (lon, lat) degrees in their X/Y ordinates but
//! their bounding boxes live in 3D geocentric space on the unit sphere.
//! These helpers convert between the two. Angles are radians unless a
//! function name says otherwise.

/// A 3D Cartesian point, usually on or near the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }
}

/// Scale a vector onto the unit sphere. The zero vector stays zero.
pub fn normalize(p: &mut Point3) {
    let d = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
    if d == 0.0 {
        return;
    }
    p.x /= d;
    p.y /= d;
    p.z /= d;
}

/// Unit-sphere Cartesian point to (lon, lat) in radians.
pub fn cart2geog(p: &Point3) -> (f64, f64) {
    let lon = p.y.atan2(p.x);
    let lat = p.z.clamp(-1.0, 1.0).asin();
    (lon, lat)
}

/// (lon, lat) in radians to a unit-sphere Cartesian point.
pub fn geog2cart(lon: f64, lat: f64) -> Point3 {
    Point3 {
        x: lat.cos() * lon.cos(),
        y: lat.cos() * lon.sin(),
        z: lat.sin(),
    }
}

/// (lon, lat) in degrees to a unit-sphere Cartesian point.
pub fn geocentric_from_degrees(lon_deg: f64, lat_deg: f64) -> Point3 {
    geog2cart(lon_deg.to_radians(), lat_deg.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_normalize_unit_length() {
        let mut p = Point3::new(3.0, 4.0, 12.0);
        normalize(&mut p);
        let len = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        assert!(close(len, 1.0));
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        let mut p = Point3::default();
        normalize(&mut p);
        assert_eq!(p, Point3::default());
    }

    #[test]
    fn test_geog_cart_round_trip() {
        for (lon_deg, lat_deg) in [(0.0, 0.0), (90.0, 0.0), (-45.0, 30.0), (179.0, -80.0)] {
            let p = geocentric_from_degrees(lon_deg, lat_deg);
            let (lon, lat) = cart2geog(&p);
            assert!(close(lon.to_degrees(), lon_deg));
            assert!(close(lat.to_degrees(), lat_deg));
        }
    }

    #[test]
    fn test_cardinal_directions() {
        let p = geocentric_from_degrees(0.0, 0.0);
        assert!(close(p.x, 1.0) && close(p.y, 0.0) && close(p.z, 0.0));
        let p = geocentric_from_degrees(0.0, 90.0);
        assert!(close(p.z, 1.0));
        let p = geocentric_from_degrees(90.0, 0.0);
        assert!(close(p.y, 1.0));
    }
}
