//! Raster grid intersection walk.
//!
//! A line profile must sample elevation at full raster resolution, not
//! just at the line's own vertices. For each segment this module
//! generates the tile set's grid lines (pixel column and row boundaries
//! in geographic coordinates) and intersects the segment with them.

use crate::ElevationError;
use demtile::{GeoPoint, GeoSegment, TileMeta};

/// Computes every point where the segment crosses a raster grid line of
/// `seg_tiles`, in traversal order from `start`.
///
/// `include_start`/`include_end` append the segment's own endpoints; a
/// multi-segment line passes `include_start` only for its first segment
/// so consecutive segments share exactly one boundary point. Without
/// coverage the result is just the flagged endpoints.
pub fn segment_intersections(
    start: &GeoPoint,
    end: &GeoPoint,
    seg_tiles: &[&TileMeta],
    include_start: bool,
    include_end: bool,
) -> Result<Vec<GeoPoint>, ElevationError> {
    let mut points = Vec::new();

    if let Some(first) = seg_tiles.first() {
        // The grid walk below runs north to south.
        if first.pixel_size_y >= 0.0 {
            return Err(ElevationError::UnsupportedOrientation);
        }

        // North-south grid lines, walked west to east.
        let (western, eastern) = if start.longitude <= end.longitude {
            (start, end)
        } else {
            (end, start)
        };
        let input = GeoSegment::new(western.clone(), eastern.clone());
        for line in north_south_lines(seg_tiles, eastern.longitude) {
            if let Some(crossing) = line_intersection(&input, &line) {
                points.push(crossing);
            }
        }

        // West-east grid lines, walked north to south.
        let (northern, southern) = if start.latitude >= end.latitude {
            (start, end)
        } else {
            (end, start)
        };
        let input = GeoSegment::new(northern.clone(), southern.clone());
        for line in west_east_lines(seg_tiles, southern.latitude) {
            if let Some(crossing) = line_intersection(&input, &line) {
                points.push(crossing);
            }
        }
    }

    if include_start {
        points.push(start.clone());
    }
    if include_end {
        points.push(end.clone());
    }

    // Restore traversal order.
    points.sort_by(|a, b| start.distance_to(a).total_cmp(&start.distance_to(b)));

    Ok(points)
}

/// 2-D intersection of two segments in lon/lat space.
///
/// Parallel or coincident lines (zero denominator) yield `None`; the
/// crossing must lie within both segments, endpoints included.
pub fn line_intersection(line1: &GeoSegment, line2: &GeoSegment) -> Option<GeoPoint> {
    let p1_x = line1.start.longitude;
    let p1_y = line1.start.latitude;
    let p2_x = line1.end.longitude;
    let p2_y = line1.end.latitude;
    let p3_x = line2.start.longitude;
    let p3_y = line2.start.latitude;
    let p4_x = line2.end.longitude;
    let p4_y = line2.end.latitude;

    let denominator = (p4_y - p3_y) * (p2_x - p1_x) - (p4_x - p3_x) * (p2_y - p1_y);
    if denominator == 0.0 {
        return None;
    }

    let u_a = ((p4_x - p3_x) * (p1_y - p3_y) - (p4_y - p3_y) * (p1_x - p3_x)) / denominator;
    let u_b = ((p2_x - p1_x) * (p1_y - p3_y) - (p2_y - p1_y) * (p1_x - p3_x)) / denominator;

    if (0.0..=1.0).contains(&u_a) && (0.0..=1.0).contains(&u_b) {
        Some(GeoPoint::new(
            p1_y + u_a * (p2_y - p1_y),
            p1_x + u_a * (p2_x - p1_x),
        ))
    } else {
        None
    }
}

/// Vertical grid lines of the tile set, one per pixel column boundary,
/// west to east, bounded by `eastern_lon`.
///
/// Tiles are grouped into columns sharing a west edge; each line spans
/// the column's full height, from the topmost tile's north edge to the
/// bottommost tile's south edge. The shared edge between two tile
/// columns is generated once, by the eastern column.
fn north_south_lines<'a>(
    seg_tiles: &[&'a TileMeta],
    eastern_lon: f64,
) -> impl Iterator<Item = GeoSegment> + 'a {
    let mut columns = group_tiles(seg_tiles, |tile| tile.origin_lon);
    columns.sort_by(|a, b| a[0].origin_lon.total_cmp(&b[0].origin_lon));

    columns.into_iter().flat_map(move |column| {
        // Groups are non-empty by construction.
        let top = column.iter().copied().fold(column[0], |best, tile| {
            if tile.origin_lat > best.origin_lat {
                tile
            } else {
                best
            }
        });
        let bottom_lat = column
            .iter()
            .map(|tile| tile.end_latitude())
            .fold(f64::INFINITY, f64::min);

        (0..top.width).map_while(move |index| {
            let lon = top.origin_lon + top.pixel_size_x * index as f64;
            if lon > eastern_lon {
                return None;
            }
            Some(GeoSegment::new(
                GeoPoint::new(top.origin_lat, lon),
                GeoPoint::new(bottom_lat, lon),
            ))
        })
    })
}

/// Horizontal grid lines of the tile set, one per pixel row boundary,
/// north to south, bounded by `southern_lat`.
fn west_east_lines<'a>(
    seg_tiles: &[&'a TileMeta],
    southern_lat: f64,
) -> impl Iterator<Item = GeoSegment> + 'a {
    let mut rows = group_tiles(seg_tiles, |tile| tile.origin_lat);
    rows.sort_by(|a, b| b[0].origin_lat.total_cmp(&a[0].origin_lat));

    rows.into_iter().flat_map(move |row| {
        let left = row.iter().copied().fold(row[0], |best, tile| {
            if tile.origin_lon < best.origin_lon {
                tile
            } else {
                best
            }
        });
        let right_lon = row
            .iter()
            .map(|tile| tile.end_longitude())
            .fold(f64::NEG_INFINITY, f64::max);

        (0..left.height).map_while(move |index| {
            let lat = left.origin_lat + left.pixel_size_y * index as f64;
            if lat < southern_lat {
                return None;
            }
            Some(GeoSegment::new(
                GeoPoint::new(lat, left.origin_lon),
                GeoPoint::new(lat, right_lon),
            ))
        })
    })
}

/// Groups tiles by an exact coordinate key. Lattice alignment makes
/// origins of one column/row bit-identical.
fn group_tiles<'a>(
    tiles: &[&'a TileMeta],
    key: impl Fn(&TileMeta) -> f64,
) -> Vec<Vec<&'a TileMeta>> {
    let mut groups: Vec<Vec<&TileMeta>> = Vec::new();
    for tile in tiles.iter().copied() {
        match groups
            .iter_mut()
            .find(|group| key(group[0]) == key(tile))
        {
            Some(group) => group.push(tile),
            None => groups.push(vec![tile]),
        }
    }
    groups
}
