//! Shared fixtures for the crate's unit tests: a 100x100, 0.01-degree
//! tile lattice and an in-memory raster opener.

use demtile::{GridRaster, RasterFormat, RasterHandle, RasterOpener, TileError, TileMeta};
use std::collections::HashMap;
use std::path::PathBuf;

pub const PIXEL: f64 = 0.01;
pub const SIZE: usize = 100;
pub const NO_DATA: f32 = -32768.0;

/// One-degree-square tile descriptor on the fixture lattice, with its
/// north-west corner at (`origin_lat`, `origin_lon`).
pub fn tile(name: &str, origin_lat: f64, origin_lon: f64) -> TileMeta {
    TileMeta {
        path: PathBuf::from(format!("{name}.hgt")),
        format: RasterFormat::Hgt,
        origin_lat,
        origin_lon,
        pixel_size_x: PIXEL,
        pixel_size_y: -PIXEL,
        width: SIZE,
        height: SIZE,
        no_data: NO_DATA,
    }
}

/// Raster opener backed by in-memory grids, one per registered tile.
/// Opening an unregistered tile fails like a missing file would.
pub struct FakeOpener {
    grids: HashMap<PathBuf, (usize, usize, Vec<f32>)>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self {
            grids: HashMap::new(),
        }
    }

    /// Registers `tile` with every sample set to `elevation`.
    pub fn constant(self, tile: &TileMeta, elevation: f32) -> Self {
        self.grid(tile, |_, _| elevation)
    }

    /// Registers `tile` with samples produced by `f(x, y)`.
    pub fn grid(mut self, tile: &TileMeta, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut samples = Vec::with_capacity(tile.width * tile.height);
        for y in 0..tile.height {
            for x in 0..tile.width {
                samples.push(f(x, y));
            }
        }
        self.grids
            .insert(tile.path.clone(), (tile.width, tile.height, samples));
        self
    }
}

impl RasterOpener for FakeOpener {
    fn open(&self, tile: &TileMeta) -> Result<Box<dyn RasterHandle>, TileError> {
        let (width, height, samples) = self
            .grids
            .get(&tile.path)
            .ok_or_else(|| TileError::NotFound(tile.path.clone()))?;
        let raster = GridRaster::new(*width, *height, samples.clone())?;
        Ok(Box::new(raster))
    }
}
