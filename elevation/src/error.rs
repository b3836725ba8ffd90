use demtile::TileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("{0}")]
    Tile(#[from] TileError),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    #[error("DEM with y axis upwards not supported")]
    UnsupportedOrientation,

    /// A resolved tile vanished from the query cache. Indicates a
    /// cache-population bug, not a user error.
    #[error("tile {0:?} not found in raster cache")]
    TileNotInCache(PathBuf),
}
