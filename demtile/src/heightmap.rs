use crate::{BoundingBox, GeoPoint};

/// A rectangular grid of elevation samples with its geographic extent.
///
/// Produced per tile by [`RasterHandle::height_map`](crate::RasterHandle)
/// and merged into a mosaic by the elevation engine. Owns no external
/// resources.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    pub bounding_box: BoundingBox,
    pub width: usize,
    pub height: usize,
    pub count: usize,
    pub min_elevation: f32,
    pub max_elevation: f32,

    /// Samples in row-major, north-to-south then west-to-east order.
    pub coordinates: Vec<GeoPoint>,
}

impl HeightMap {
    /// A zero-sample grid spanning `bounding_box`.
    pub fn empty(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            width: 0,
            height: 0,
            count: 0,
            min_elevation: 0.0,
            max_elevation: 0.0,
            coordinates: Vec::new(),
        }
    }
}
