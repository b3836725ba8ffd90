//! Point elevation sampling against open rasters.
//!
//! A sampler is created per query and keeps the carry-forward state used
//! to paper over no-data cells, so one instance must see a query's
//! points in traversal order.

use crate::{interpolate::Interpolator, ElevationError, InterpolationMode, RasterCache};
use demtile::{GeoPoint, RasterHandle, TileMeta};
use log::debug;

/// Elevation reported where the rasters have nothing better to offer.
pub const NO_DATA_OUT: f32 = 0.0;

/// Fractional pixel offsets closer than this to a grid node are snapped
/// onto it, so lattice points survive degree-to-index float round-trips.
const GRID_SNAP: f64 = 1e-9;

/// Tolerance, in pixel units, for matching a sample onto a neighboring
/// tile's lattice.
const LATTICE_EPSILON: f64 = 1e-6;

pub struct ElevationSampler<'a, 'o> {
    cache: &'a RasterCache<'o>,
    interpolator: &'static dyn Interpolator,
    last_elevation: f32,
}

impl<'a, 'o> ElevationSampler<'a, 'o> {
    pub fn new(cache: &'a RasterCache<'o>, mode: InterpolationMode) -> Self {
        Self {
            cache,
            interpolator: mode.interpolator(),
            last_elevation: NO_DATA_OUT,
        }
    }

    /// Fills `point.elevation` from `tile`, which must contain the point
    /// and be open in the query cache.
    ///
    /// A point on a grid node gets the raw sample; anywhere else the four
    /// surrounding samples are interpolated, with no-data corners
    /// replaced by the average of the valid ones. A result that still
    /// comes out as no-data repeats the previous sampled elevation.
    pub fn sample_into(
        &mut self,
        tile: &TileMeta,
        point: &mut GeoPoint,
    ) -> Result<(), ElevationError> {
        let handle = self
            .cache
            .handle(tile)
            .ok_or_else(|| ElevationError::TileNotInCache(tile.path.clone()))?;

        let x = snap((point.longitude - tile.origin_lon) / tile.pixel_size_x);
        let y = snap((point.latitude - tile.origin_lat) / tile.pixel_size_y);
        let x_int = x.floor() as isize;
        let y_int = y.floor() as isize;
        let x_frac = (x - x.floor()) as f32;
        let y_frac = (y - y.floor()) as f32;

        let mut elevation = if x_frac == 0.0 && y_frac == 0.0 {
            self.raw_sample(tile, handle, x_int, y_int)
                .unwrap_or(NO_DATA_OUT)
        } else {
            let nw = self.raw_sample(tile, handle, x_int, y_int);
            let ne = self.raw_sample(tile, handle, x_int + 1, y_int);
            let sw = self.raw_sample(tile, handle, x_int, y_int + 1);
            let se = self.raw_sample(tile, handle, x_int + 1, y_int + 1);
            let nw = nw.unwrap_or_else(|| average_of_valid(&[ne, sw, se]));
            let ne = ne.unwrap_or_else(|| average_of_valid(&[Some(nw), sw, se]));
            let sw = sw.unwrap_or_else(|| average_of_valid(&[Some(nw), Some(ne), se]));
            let se = se.unwrap_or_else(|| average_of_valid(&[Some(nw), Some(ne), Some(sw)]));
            self.interpolator.interpolate(sw, se, nw, ne, x_frac, y_frac)
        };

        if elevation == NO_DATA_OUT {
            debug!("no data at {point}, repeating previous elevation");
            elevation = self.last_elevation;
        }

        self.last_elevation = elevation;
        point.elevation = Some(f64::from(elevation));
        Ok(())
    }

    /// Valid sample at grid index (x, y) of `tile`, following indices
    /// past the tile edge into whichever open neighbor holds them.
    fn raw_sample(
        &self,
        tile: &TileMeta,
        handle: &dyn RasterHandle,
        x: isize,
        y: isize,
    ) -> Option<f32> {
        if (0..tile.width as isize).contains(&x) && (0..tile.height as isize).contains(&y) {
            let value = handle.read_pixel(x as usize, y as usize);
            return (value != tile.no_data).then_some(value);
        }
        self.neighbor_sample(tile, x, y)
    }

    /// Resolves an out-of-range index to the open tile sharing that
    /// lattice node. All tiles of a dataset sit on one lattice, so the
    /// node either lands on a neighbor's grid or is outside coverage.
    fn neighbor_sample(&self, tile: &TileMeta, x: isize, y: isize) -> Option<f32> {
        let lon = tile.origin_lon + tile.pixel_size_x * x as f64;
        let lat = tile.origin_lat + tile.pixel_size_y * y as f64;
        for candidate in self.cache.tiles() {
            if candidate == tile {
                continue;
            }
            let fx = (lon - candidate.origin_lon) / candidate.pixel_size_x;
            let fy = (lat - candidate.origin_lat) / candidate.pixel_size_y;
            let cx = fx.round();
            let cy = fy.round();
            if (fx - cx).abs() > LATTICE_EPSILON || (fy - cy).abs() > LATTICE_EPSILON {
                continue;
            }
            if cx < 0.0
                || cy < 0.0
                || cx >= candidate.width as f64
                || cy >= candidate.height as f64
            {
                continue;
            }
            let handle = self.cache.handle(candidate)?;
            let value = handle.read_pixel(cx as usize, cy as usize);
            return (value != candidate.no_data).then_some(value);
        }
        None
    }
}

fn snap(index: f64) -> f64 {
    if (index - index.round()).abs() < GRID_SNAP {
        index.round()
    } else {
        index
    }
}

/// Average of the valid samples, `NO_DATA_OUT` when there are none.
fn average_of_valid(samples: &[Option<f32>]) -> f32 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for sample in samples.iter().flatten() {
        sum += sample;
        count += 1;
    }
    if count == 0 {
        NO_DATA_OUT
    } else {
        sum / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{ElevationSampler, NO_DATA_OUT};
    use crate::{fixtures, ElevationError, InterpolationMode, RasterCache};
    use approx::assert_relative_eq;
    use demtile::GeoPoint;

    fn sampled(sampler: &mut ElevationSampler, tile: &demtile::TileMeta, lat: f64, lon: f64) -> f64 {
        let mut point = GeoPoint::new(lat, lon);
        sampler.sample_into(tile, &mut point).unwrap();
        point.elevation.unwrap()
    }

    #[test]
    fn test_raw_sample_on_grid_node() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().grid(&tile, |x, y| (y * 100 + x) as f32);
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        // Node (x, y) = (3, 2).
        let elevation = sampled(&mut sampler, &tile, 0.98, 0.03);
        assert_relative_eq!(elevation, 203.0, epsilon = 1e-3);
    }

    #[test]
    fn test_bilinear_between_nodes() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().grid(&tile, |x, y| (y * 100 + x) as f32);
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        // Center of nodes (3, 2), (4, 2), (3, 3), (4, 3).
        let elevation = sampled(&mut sampler, &tile, 0.975, 0.035);
        assert_relative_eq!(elevation, 253.5, epsilon = 1e-3);
    }

    #[test]
    fn test_no_data_corner_replaced_by_average_of_valid() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().grid(&tile, |x, y| {
            if (x, y) == (3, 2) {
                fixtures::NO_DATA
            } else {
                (y * 100 + x) as f32
            }
        });
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        // (204 + 303 + 304) / 3 stands in for the dead north-west corner,
        // and the center average repeats it.
        let elevation = sampled(&mut sampler, &tile, 0.975, 0.035);
        assert_relative_eq!(elevation, 270.3333, epsilon = 1e-2);
    }

    #[test]
    fn test_no_data_node_repeats_previous_elevation() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().grid(&tile, |_, y| {
            if y < 5 {
                fixtures::NO_DATA
            } else {
                50.0
            }
        });
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        // Fresh sampler has nothing to repeat yet.
        let elevation = sampled(&mut sampler, &tile, 0.98, 0.5);
        assert_relative_eq!(elevation, f64::from(NO_DATA_OUT));

        let elevation = sampled(&mut sampler, &tile, 0.055, 0.5);
        assert_relative_eq!(elevation, 50.0, epsilon = 1e-3);

        // Dead node inherits the 50.0 above.
        let elevation = sampled(&mut sampler, &tile, 0.98, 0.5);
        assert_relative_eq!(elevation, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_all_no_data_corners_repeat_previous_elevation() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().grid(&tile, |_, y| {
            if y < 5 {
                fixtures::NO_DATA
            } else {
                50.0
            }
        });
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        let elevation = sampled(&mut sampler, &tile, 0.055, 0.5);
        assert_relative_eq!(elevation, 50.0, epsilon = 1e-3);

        // Mid-cell point whose four corners are all dead; the 50.0
        // above carries through the interpolated path too.
        let elevation = sampled(&mut sampler, &tile, 0.975, 0.035);
        assert_relative_eq!(elevation, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_interpolation_reads_across_tile_edge() {
        let tile_a = fixtures::tile("a", 1.0, 0.0);
        let tile_b = fixtures::tile("b", 1.0, 1.0);
        let opener = fixtures::FakeOpener::new()
            .constant(&tile_a, 10.0)
            .constant(&tile_b, 20.0);
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile_a).unwrap();
        cache.ensure_open(&tile_b).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        // Halfway between tile a's last column and tile b's first.
        let elevation = sampled(&mut sampler, &tile_a, 0.505, 0.995);
        assert_relative_eq!(elevation, 15.0, epsilon = 1e-3);

        // Exactly on the shared edge, sampled through tile a.
        let elevation = sampled(&mut sampler, &tile_a, 0.5, 1.0);
        assert_relative_eq!(elevation, 20.0, epsilon = 1e-3);

        // Same spot west of tile b's first column, so the western
        // corners resolve through a negative index into tile a.
        let elevation = sampled(&mut sampler, &tile_b, 0.505, 0.995);
        assert_relative_eq!(elevation, 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_unopened_neighbor_degrades_to_valid_corners() {
        let tile_a = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().constant(&tile_a, 10.0);
        let mut cache = RasterCache::new(&opener);
        cache.ensure_open(&tile_a).unwrap();
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);

        let elevation = sampled(&mut sampler, &tile_a, 0.505, 0.995);
        assert_relative_eq!(elevation, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_unopened_tile_is_an_error() {
        let tile = fixtures::tile("a", 1.0, 0.0);
        let opener = fixtures::FakeOpener::new().constant(&tile, 10.0);
        let cache = RasterCache::new(&opener);
        let mut sampler = ElevationSampler::new(&cache, InterpolationMode::Bilinear);
        let mut point = GeoPoint::new(0.5, 0.5);
        match sampler.sample_into(&tile, &mut point) {
            Err(ElevationError::TileNotInCache(path)) => assert_eq!(path, tile.path),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
