//! DEM raster tile primitives.
//!
//! Types shared by the elevation engine: geographic value types
//! ([`GeoPoint`], [`GeoSegment`], [`BoundingBox`]), tile descriptors
//! ([`TileMeta`]), raster access ([`RasterHandle`], [`RasterOpener`]) and
//! height grids ([`HeightMap`]).
//!
//! Binary raster decoding (GeoTIFF, HGT, ...) is deliberately not part of
//! this crate; it lives behind the [`RasterOpener`] trait.

mod error;
mod heightmap;
mod primitives;
mod raster;
mod tile;

pub use crate::{
    error::TileError,
    heightmap::HeightMap,
    primitives::{BoundingBox, GeoPoint, GeoSegment},
    raster::{GridRaster, RasterHandle, RasterOpener},
    tile::{RasterFormat, TileMeta},
};

/// Mean Earth radius in meters, used for all spherical distance math.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.0;
