//! Height map mosaicking.

use demtile::{BoundingBox, HeightMap};

/// Merges per-tile height maps clipped to one query box into a single
/// grid.
///
/// The merged width is the summed width of the northernmost band of
/// maps, the merged height the summed height of the westernmost column;
/// on a shared lattice those are the mosaic's true dimensions. Samples
/// are re-sorted into row-major, north-to-south then west-to-east order.
/// With nothing to merge the result is an empty grid spanning `bbox`.
pub fn merge(bbox: &BoundingBox, maps: Vec<HeightMap>) -> HeightMap {
    let maps: Vec<HeightMap> = maps.into_iter().filter(|map| map.count > 0).collect();
    let Some(first) = maps.first() else {
        return HeightMap::empty(*bbox);
    };

    let mut extent = first.bounding_box;
    let mut min_elevation = f32::MAX;
    let mut max_elevation = f32::MIN;
    for map in &maps {
        extent = extent.union(&map.bounding_box);
        min_elevation = min_elevation.min(map.min_elevation);
        max_elevation = max_elevation.max(map.max_elevation);
    }

    let top = maps
        .iter()
        .map(|map| map.bounding_box.y_max)
        .fold(f64::NEG_INFINITY, f64::max);
    let left = maps
        .iter()
        .map(|map| map.bounding_box.x_min)
        .fold(f64::INFINITY, f64::min);
    let width = maps
        .iter()
        .filter(|map| map.bounding_box.y_max == top)
        .map(|map| map.width)
        .sum();
    let height = maps
        .iter()
        .filter(|map| map.bounding_box.x_min == left)
        .map(|map| map.height)
        .sum();

    let mut coordinates: Vec<_> = maps.into_iter().flat_map(|map| map.coordinates).collect();
    coordinates.sort_by(|a, b| {
        b.latitude
            .total_cmp(&a.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
    });
    // Holds whenever the merged maps tile a full rectangle of the
    // dataset lattice.
    debug_assert_eq!(coordinates.len(), width * height);

    HeightMap {
        bounding_box: extent,
        width,
        height,
        count: coordinates.len(),
        min_elevation,
        max_elevation,
        coordinates,
    }
}
