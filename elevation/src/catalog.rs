//! Tile catalog queries.
//!
//! The manifest itself (downloading, metadata generation) is an external
//! collaborator; the engine works from an already-loaded descriptor list.

use demtile::{BoundingBox, GeoPoint, TileMeta};
use log::warn;

/// Returns the catalog tiles whose extent overlaps `bbox`.
///
/// An empty result is a non-fatal "no coverage" condition: it is logged
/// as a warning and the caller gets an empty list.
pub fn covering_tiles<'a>(
    catalog: impl IntoIterator<Item = &'a TileMeta>,
    bbox: &BoundingBox,
) -> Vec<&'a TileMeta> {
    let tiles: Vec<&TileMeta> = catalog
        .into_iter()
        .filter(|tile| tile.intersects(bbox))
        .collect();
    if tiles.is_empty() {
        warn!("no coverage found matching bounding box {bbox}");
    }
    tiles
}

/// Returns the catalog tiles containing the given location.
///
/// A point on a shared tile edge belongs to every adjoining tile.
pub fn covering_tiles_at<'a>(
    catalog: impl IntoIterator<Item = &'a TileMeta>,
    lat: f64,
    lon: f64,
) -> Vec<&'a TileMeta> {
    let point = GeoPoint::new(lat, lon);
    let tiles: Vec<&TileMeta> = catalog
        .into_iter()
        .filter(|tile| tile.contains(&point))
        .collect();
    if tiles.is_empty() {
        warn!("no coverage found matching point {point}");
    }
    tiles
}
