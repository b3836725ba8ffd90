//! Tabular export of profile results.

use demtile::GeoPoint;

/// Renders a sampled profile as a tab-separated table, one row per
/// point. Missing distances print as 0; missing elevations stay blank.
pub fn elevation_table(points: &[GeoPoint]) -> String {
    let mut table = String::from("Lon\tLat\tDistance (meters)\tZ\n");
    for point in points {
        let elevation = point
            .elevation
            .map(|elevation| elevation.to_string())
            .unwrap_or_default();
        table.push_str(&format!(
            "{}\t{}\t{:.2}\t{}\n",
            point.longitude,
            point.latitude,
            point.distance_from_origin.unwrap_or(0.0),
            elevation,
        ));
    }
    table
}
