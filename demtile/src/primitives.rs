use crate::MEAN_EARTH_RADIUS;
use geo::geometry::Coord;
use std::fmt;

/// A geographic location in WGS84 degrees.
///
/// `elevation` and `distance_from_origin` start out empty and are filled
/// in by the elevation engine while it walks a query.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,

    /// Elevation in meters, once resolved.
    pub elevation: Option<f64>,

    /// Running distance from the profile origin, in meters.
    pub distance_from_origin: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            distance_from_origin: None,
        }
    }

    /// Spherical distance to `other` in meters.
    ///
    /// Great-circle distance on the mean Earth radius. Coincident or
    /// numerically degenerate inputs return 0.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let delta_lat = (self.latitude - other.latitude).abs();
        let delta_lon = (self.longitude - other.longitude).abs();
        if delta_lat == 0.0 && delta_lon == 0.0 {
            return 0.0;
        }

        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let delta_lon = delta_lon.to_radians();

        let cos = delta_lon.cos() * lat_a.cos() * lat_b.cos() + lat_a.sin() * lat_b.sin();
        let distance = MEAN_EARTH_RADIUS * cos.acos();
        if distance.is_nan() {
            // Rounding pushed the cosine past 1; the points are all but
            // the same.
            0.0
        } else {
            distance
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat: {}, lon: {}", self.latitude, self.longitude)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(Coord { x, y }: Coord<f64>) -> Self {
        Self::new(y, x)
    }
}

impl From<&GeoPoint> for Coord<f64> {
    fn from(point: &GeoPoint) -> Self {
        Coord {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

/// An ordered pair of points. Direction is whatever the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSegment {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl GeoSegment {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.start.longitude.min(self.end.longitude),
            self.start.longitude.max(self.end.longitude),
            self.start.latitude.min(self.end.latitude),
            self.start.latitude.max(self.end.latitude),
        )
    }
}

/// Geographic bounding box in degrees.
///
/// Invariant: `x_min <= x_max` and `y_min <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Smallest box containing every point, or `None` for an empty set.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = Self {
            x_min: first.longitude,
            x_max: first.longitude,
            y_min: first.latitude,
            y_max: first.latitude,
        };
        for point in points {
            bbox.x_min = bbox.x_min.min(point.longitude);
            bbox.x_max = bbox.x_max.max(point.longitude);
            bbox.y_min = bbox.y_min.min(point.latitude);
            bbox.y_max = bbox.y_max.max(point.latitude);
        }
        Some(bbox)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.y_min <= lat && lat <= self.y_max && self.x_min <= lon && lon <= self.x_max
    }

    /// Inclusive overlap test; boxes sharing only an edge intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_max >= other.x_min
            && self.x_min <= other.x_max
            && self.y_max >= other.y_min
            && self.y_min <= other.y_max
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "xmin: {}, xmax: {}, ymin: {}, ymax: {}",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, GeoPoint, GeoSegment};
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_one_degree_of_longitude_at_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert_relative_eq!(a.distance_to(&b), 111_194.926, epsilon = 1e-2);
        assert_relative_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_distance_coincident_is_zero() {
        let a = GeoPoint::new(44.2705, -71.30325);
        assert_eq!(a.distance_to(&a.clone()), 0.0);
    }

    #[test]
    fn test_distance_shrinks_with_latitude() {
        let equator = GeoPoint::new(0.0, 0.0).distance_to(&GeoPoint::new(0.0, 1.0));
        let mid = GeoPoint::new(60.0, 0.0).distance_to(&GeoPoint::new(60.0, 1.0));
        assert!(mid < equator / 1.9);
    }

    #[test]
    fn test_segment_bounding_box_is_ordered() {
        let segment = GeoSegment::new(GeoPoint::new(2.0, 5.0), GeoPoint::new(-1.0, 3.0));
        let bbox = segment.bounding_box();
        assert_eq!(bbox, BoundingBox::new(3.0, 5.0, -1.0, 2.0));
    }

    #[test]
    fn test_of_points() {
        let points = [
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(-3.0, 7.0),
            GeoPoint::new(0.5, -1.0),
        ];
        let bbox = BoundingBox::of_points(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(-1.0, 7.0, -3.0, 1.0));

        let empty: [GeoPoint; 0] = [];
        assert_eq!(BoundingBox::of_points(&empty), None);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        assert!(bbox.contains(0.0, 0.0));
        assert!(bbox.contains(1.0, 1.0));
        assert!(bbox.contains(0.5, 0.5));
        assert!(!bbox.contains(0.5, 1.1));
        assert!(!bbox.contains(-0.1, 0.5));
    }

    #[test]
    fn test_intersects_shared_edge() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(1.0, 2.0, 0.0, 1.0);
        let c = BoundingBox::new(1.5, 2.0, 2.0, 3.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(-1.0, 0.5, 0.5, 2.0);
        assert_eq!(a.union(&b), BoundingBox::new(-1.0, 1.0, 0.0, 2.0));
    }
}
