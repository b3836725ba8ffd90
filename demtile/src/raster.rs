use crate::{BoundingBox, GeoPoint, HeightMap, TileError, TileMeta};

/// Open handle onto one tile's raw elevation grid.
///
/// Implementations own the underlying file resource; dropping the handle
/// releases it. Pixel (0, 0) is the north-west sample.
pub trait RasterHandle {
    /// Raw value at pixel (x, y), no-data sentinel included.
    ///
    /// Callers must remap indices into `[0, width) x [0, height)` first.
    fn read_pixel(&self, x: usize, y: usize) -> f32;

    /// This tile's height grid clipped to `bbox`, with `no_data` samples
    /// replaced by `no_data_out`.
    fn height_map(&self, meta: &TileMeta, bbox: &BoundingBox, no_data_out: f32) -> HeightMap;
}

/// Opens raster files. Binary decoding (GeoTIFF, HGT, ...) lives behind
/// this trait; the engine only ever sees handles.
pub trait RasterOpener {
    fn open(&self, tile: &TileMeta) -> Result<Box<dyn RasterHandle>, TileError>;
}

/// Row-major in-memory f32 grid, north-west sample first.
pub struct GridRaster {
    width: usize,
    height: usize,
    samples: Box<[f32]>,
}

impl GridRaster {
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Result<Self, TileError> {
        if samples.len() != width * height {
            return Err(TileError::GridLen {
                width,
                height,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Builds a grid by evaluating `f` at each pixel (x, y).
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples: samples.into_boxed_slice(),
        }
    }
}

impl RasterHandle for GridRaster {
    fn read_pixel(&self, x: usize, y: usize) -> f32 {
        self.samples[y * self.width + x]
    }

    fn height_map(&self, meta: &TileMeta, bbox: &BoundingBox, no_data_out: f32) -> HeightMap {
        // Pixel index range whose grid nodes fall inside bbox. Y grows
        // southward (negative pixel size), hence the swapped bounds.
        let x_first = ((bbox.x_min - meta.origin_lon) / meta.pixel_size_x).ceil() as isize;
        let x_last = ((bbox.x_max - meta.origin_lon) / meta.pixel_size_x).floor() as isize;
        let y_first = ((bbox.y_max - meta.origin_lat) / meta.pixel_size_y).ceil() as isize;
        let y_last = ((bbox.y_min - meta.origin_lat) / meta.pixel_size_y).floor() as isize;

        // The node range can miss the bbox entirely, e.g. a bbox covering
        // only the sliver past a tile's last grid node.
        if x_first >= self.width as isize
            || x_last < 0
            || y_first >= self.height as isize
            || y_last < 0
            || x_first > x_last
            || y_first > y_last
        {
            return HeightMap::empty(*bbox);
        }

        let x_first = x_first.clamp(0, self.width as isize - 1) as usize;
        let x_last = x_last.clamp(0, self.width as isize - 1) as usize;
        let y_first = y_first.clamp(0, self.height as isize - 1) as usize;
        let y_last = y_last.clamp(0, self.height as isize - 1) as usize;

        let width = x_last - x_first + 1;
        let height = y_last - y_first + 1;
        let mut coordinates = Vec::with_capacity(width * height);
        let mut min_elevation = f32::MAX;
        let mut max_elevation = f32::MIN;

        for y in y_first..=y_last {
            let latitude = meta.origin_lat + meta.pixel_size_y * y as f64;
            for x in x_first..=x_last {
                let longitude = meta.origin_lon + meta.pixel_size_x * x as f64;
                let mut elevation = self.read_pixel(x, y);
                if elevation == meta.no_data {
                    elevation = no_data_out;
                }
                min_elevation = min_elevation.min(elevation);
                max_elevation = max_elevation.max(elevation);
                let mut point = GeoPoint::new(latitude, longitude);
                point.elevation = Some(f64::from(elevation));
                coordinates.push(point);
            }
        }

        HeightMap {
            bounding_box: BoundingBox::new(
                meta.origin_lon + meta.pixel_size_x * x_first as f64,
                meta.origin_lon + meta.pixel_size_x * x_last as f64,
                meta.origin_lat + meta.pixel_size_y * y_last as f64,
                meta.origin_lat + meta.pixel_size_y * y_first as f64,
            ),
            width,
            height,
            count: width * height,
            min_elevation,
            max_elevation,
            coordinates,
        }
    }
}
