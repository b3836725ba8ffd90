use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no raster available for {0:?}")]
    NotFound(PathBuf),

    #[error("grid sample count {actual} does not match {width}x{height}")]
    GridLen {
        width: usize,
        height: usize,
        actual: usize,
    },
}
