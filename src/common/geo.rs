//! Geometry over E7 points
//!
//! Coordinates travel as `i32` degrees scaled by 10^7. Latitudes are valid in
//! +/-90 degrees and longitudes in +/-180 degrees, both inclusive.

use crate::common::{Error, Result};
use crate::proto::{Point, Rectangle};

/// Scale between E7 integers and degrees.
pub const E7: f64 = 10_000_000.0;

/// Largest valid |latitude| in E7.
pub const MAX_LATITUDE: i32 = 900_000_000;

/// Largest valid |longitude| in E7.
pub const MAX_LONGITUDE: i32 = 1_800_000_000;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convert an E7 coordinate to degrees.
pub fn to_degrees(e7: i32) -> f64 {
    e7 as f64 / E7
}

/// Great-circle distance in metres between two points (haversine).
///
/// ```
/// use routeguide::common::geo::distance;
/// use routeguide::proto::Point;
///
/// // One degree of latitude along a meridian
/// let d = distance(
///     &Point { latitude: 0, longitude: 0 },
///     &Point { latitude: 10_000_000, longitude: 0 },
/// );
/// assert_eq!(d.round(), 111_195.0);
/// ```
pub fn distance(a: &Point, b: &Point) -> f64 {
    let lat1 = to_degrees(a.latitude).to_radians();
    let lat2 = to_degrees(b.latitude).to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to_degrees(b.longitude) - to_degrees(a.longitude)).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Round a distance to whole metres for the wire. Saturates at `i32::MAX`.
pub fn metres(distance: f64) -> i32 {
    distance.round() as i32
}

/// Normalized latitude/longitude box built from two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lat_min: i32,
    pub lat_max: i32,
    pub lon_min: i32,
    pub lon_max: i32,
}

impl Bounds {
    /// Build from any two diagonally opposite corners.
    pub fn from_corners(a: &Point, b: &Point) -> Self {
        Self {
            lat_min: a.latitude.min(b.latitude),
            lat_max: a.latitude.max(b.latitude),
            lon_min: a.longitude.min(b.longitude),
            lon_max: a.longitude.max(b.longitude),
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: &Point) -> bool {
        (self.lat_min..=self.lat_max).contains(&p.latitude)
            && (self.lon_min..=self.lon_max).contains(&p.longitude)
    }
}

impl From<&Rectangle> for Bounds {
    /// A missing corner decodes as the origin, matching proto3 defaults.
    fn from(rect: &Rectangle) -> Self {
        let origin = Point::default();
        Self::from_corners(
            rect.lo.as_ref().unwrap_or(&origin),
            rect.hi.as_ref().unwrap_or(&origin),
        )
    }
}

/// True iff `p` lies inside `rect`, whatever the order of its corners.
pub fn contains(rect: &Rectangle, p: &Point) -> bool {
    Bounds::from(rect).contains(p)
}

/// Reject points outside the E7 latitude/longitude ranges.
pub fn validate_point(p: &Point) -> Result<()> {
    if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&p.latitude) {
        return Err(Error::InvalidArgument(format!(
            "latitude {} out of range [-{}, {}]",
            p.latitude, MAX_LATITUDE, MAX_LATITUDE
        )));
    }
    if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&p.longitude) {
        return Err(Error::InvalidArgument(format!(
            "longitude {} out of range [-{}, {}]",
            p.longitude, MAX_LONGITUDE, MAX_LONGITUDE
        )));
    }
    Ok(())
}

/// A rectangle needs both corners, each in range.
pub fn validate_rectangle(rect: &Rectangle) -> Result<Bounds> {
    let lo = rect
        .lo
        .as_ref()
        .ok_or_else(|| Error::InvalidArgument("rectangle is missing its lo corner".into()))?;
    let hi = rect
        .hi
        .as_ref()
        .ok_or_else(|| Error::InvalidArgument("rectangle is missing its hi corner".into()))?;
    validate_point(lo)?;
    validate_point(hi)?;
    Ok(Bounds::from_corners(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(latitude: i32, longitude: i32) -> Point {
        Point {
            latitude,
            longitude,
        }
    }

    fn rect(lo: Point, hi: Point) -> Rectangle {
        Rectangle {
            lo: Some(lo),
            hi: Some(hi),
        }
    }

    #[test]
    fn test_distance_identity() {
        for p in [
            pt(0, 0),
            pt(409_146_138, -746_188_906),
            pt(MAX_LATITUDE, MAX_LONGITUDE),
            pt(-MAX_LATITUDE, -MAX_LONGITUDE),
        ] {
            assert_eq!(distance(&p, &p), 0.0);
        }
    }

    #[test]
    fn test_distance_symmetric() {
        let a = pt(407_838_351, -746_143_763);
        let b = pt(419_999_544, -740_371_136);
        assert_eq!(metres(distance(&a, &b)), metres(distance(&b, &a)));
    }

    #[test]
    fn test_distance_one_degree() {
        // 2 * pi * 6_371_000 / 360
        assert_eq!(metres(distance(&pt(0, 0), &pt(10_000_000, 0))), 111_195);
        assert_eq!(metres(distance(&pt(0, 0), &pt(0, 10_000_000))), 111_195);
    }

    #[test]
    fn test_distance_antipodal() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        let d = distance(&pt(0, 0), &pt(0, MAX_LONGITUDE));
        assert!((d - half_circumference).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_contains_any_corner_order() {
        let corners = [
            (pt(10, 10), pt(20, 20)),
            (pt(20, 20), pt(10, 10)),
            (pt(10, 20), pt(20, 10)),
            (pt(20, 10), pt(10, 20)),
        ];
        for (a, b) in corners {
            let r = rect(a, b);
            assert!(contains(&r, &pt(15, 15)));
            // Edges and corners are inclusive
            assert!(contains(&r, &pt(10, 10)));
            assert!(contains(&r, &pt(20, 20)));
            assert!(contains(&r, &pt(10, 17)));
            assert!(!contains(&r, &pt(9, 15)));
            assert!(!contains(&r, &pt(21, 15)));
            assert!(!contains(&r, &pt(15, 9)));
            assert!(!contains(&r, &pt(15, 21)));
        }
    }

    #[test]
    fn test_contains_degenerate_rectangle() {
        let r = rect(pt(5, 5), pt(5, 5));
        assert!(contains(&r, &pt(5, 5)));
        assert!(!contains(&r, &pt(5, 6)));
    }

    #[test]
    fn test_validate_point() {
        assert!(validate_point(&pt(MAX_LATITUDE, MAX_LONGITUDE)).is_ok());
        assert!(validate_point(&pt(-MAX_LATITUDE, -MAX_LONGITUDE)).is_ok());
        assert!(matches!(
            validate_point(&pt(MAX_LATITUDE + 1, 0)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_point(&pt(0, -MAX_LONGITUDE - 1)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(validate_point(&pt(i32::MIN, 0)).is_err());
        // Longitude range is wider than latitude
        assert!(validate_point(&pt(0, MAX_LATITUDE + 1)).is_ok());
    }

    #[test]
    fn test_validate_rectangle() {
        let bounds = validate_rectangle(&rect(pt(20, -5), pt(10, 5))).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                lat_min: 10,
                lat_max: 20,
                lon_min: -5,
                lon_max: 5
            }
        );

        let missing = Rectangle {
            lo: Some(pt(0, 0)),
            hi: None,
        };
        assert!(validate_rectangle(&missing).is_err());
        assert!(validate_rectangle(&rect(pt(0, 0), pt(MAX_LATITUDE + 1, 0))).is_err());
    }

    #[test]
    fn test_degree_conversion() {
        assert!((to_degrees(409_146_138) - 40.9146138).abs() < 1e-9);
    }
}
