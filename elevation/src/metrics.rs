//! Profile statistics.

use demtile::GeoPoint;

/// Summary figures for a sampled elevation profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElevationMetrics {
    /// Total ground distance in meters.
    pub distance: f64,
    /// Sum of positive elevation deltas, in meters.
    pub climb: f64,
    /// Sum of negative elevation deltas, in meters (non-positive).
    pub descent: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub num_points: usize,
}

/// Fills each point's running distance from the first point, in meters.
pub fn accumulate_distances(points: &mut [GeoPoint]) {
    if let Some(first) = points.first_mut() {
        first.distance_from_origin = Some(0.0);
    }
    let mut total = 0.0;
    for index in 1..points.len() {
        total += points[index - 1].distance_to(&points[index]);
        points[index].distance_from_origin = Some(total);
    }
}

/// Computes profile metrics over `points` in traversal order. Unresolved
/// elevations count as 0.
pub fn compute_metrics(points: &[GeoPoint]) -> ElevationMetrics {
    let mut metrics = ElevationMetrics {
        num_points: points.len(),
        ..ElevationMetrics::default()
    };
    let Some(first) = points.first() else {
        return metrics;
    };

    let mut previous_elevation = first.elevation.unwrap_or(0.0);
    metrics.min_elevation = previous_elevation;
    metrics.max_elevation = previous_elevation;

    for pair in points.windows(2) {
        metrics.distance += pair[0].distance_to(&pair[1]);
        let elevation = pair[1].elevation.unwrap_or(0.0);
        let delta = elevation - previous_elevation;
        if delta > 0.0 {
            metrics.climb += delta;
        } else {
            metrics.descent += delta;
        }
        metrics.min_elevation = metrics.min_elevation.min(elevation);
        metrics.max_elevation = metrics.max_elevation.max(elevation);
        previous_elevation = elevation;
    }
    metrics
}
