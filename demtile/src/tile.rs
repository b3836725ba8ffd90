use crate::{BoundingBox, GeoPoint};
use std::{
    hash::{Hash, Hasher},
    path::PathBuf,
};

/// On-disk raster encoding of a tile. Decoding is the raster opener's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    GeoTiff,
    Hgt,
}

/// Descriptor for one DEM raster tile, as recorded in a dataset manifest.
///
/// `origin_lat`/`origin_lon` locate the north-west corner of the tile.
/// `pixel_size_x` is positive and `pixel_size_y` negative: only north-up
/// rasters are supported. All tiles of one dataset share pixel scale and
/// lie on a common lattice, so a cardinal neighbor's origin differs by
/// exactly one tile width/height.
#[derive(Debug, Clone)]
pub struct TileMeta {
    pub path: PathBuf,
    pub format: RasterFormat,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub pixel_size_x: f64,
    pub pixel_size_y: f64,
    pub width: usize,
    pub height: usize,
    /// Sentinel marking an unmeasured raster cell.
    pub no_data: f32,
}

impl TileMeta {
    /// Longitude of the eastern edge.
    pub fn end_longitude(&self) -> f64 {
        self.origin_lon + self.width_degrees()
    }

    /// Latitude of the southern edge.
    pub fn end_latitude(&self) -> f64 {
        self.origin_lat - self.height_degrees()
    }

    pub fn width_degrees(&self) -> f64 {
        self.pixel_size_x * self.width as f64
    }

    pub fn height_degrees(&self) -> f64 {
        (self.pixel_size_y * self.height as f64).abs()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin_lon,
            self.end_longitude(),
            self.end_latitude(),
            self.origin_lat,
        )
    }

    /// Inclusive containment test; a point on a shared tile edge is in
    /// both tiles.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.bounding_box()
            .contains(point.latitude, point.longitude)
    }

    pub fn intersects(&self, bbox: &BoundingBox) -> bool {
        self.bounding_box().intersects(bbox)
    }

    /// True when `point` lies within two pixels of this tile's box.
    ///
    /// Interpolating a point near a tile edge reads into the neighboring
    /// tiles; this picks the tiles worth opening for that.
    pub fn is_adjacent_to(&self, point: &GeoPoint) -> bool {
        let bbox = self.bounding_box();
        let margin_x = self.pixel_size_x * 2.0;
        let margin_y = self.pixel_size_y.abs() * 2.0;
        bbox.y_min - margin_y <= point.latitude
            && point.latitude <= bbox.y_max + margin_y
            && bbox.x_min - margin_x <= point.longitude
            && point.longitude <= bbox.x_max + margin_x
    }
}

/// Tile identity is the backing file.
impl PartialEq for TileMeta {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for TileMeta {}

impl Hash for TileMeta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
