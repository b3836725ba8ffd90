use crate::ElevationError;
use demtile::{RasterHandle, RasterOpener, TileMeta};
use log::debug;
use std::collections::HashMap;

/// Query-scoped tile-to-open-raster mapping.
///
/// Owned by exactly one query execution; never shared across queries, so
/// no locking is involved. Entries are never removed mid-query, which
/// lets a line revisiting a tile reuse the open handle. Every handle is
/// released when the cache is dropped at query end, on success and error
/// paths alike.
pub struct RasterCache<'a> {
    opener: &'a dyn RasterOpener,
    rasters: HashMap<TileMeta, Box<dyn RasterHandle>>,
}

impl<'a> RasterCache<'a> {
    pub fn new(opener: &'a dyn RasterOpener) -> Self {
        Self {
            opener,
            rasters: HashMap::new(),
        }
    }

    /// Opens `tile` unless the query already did. Idempotent.
    pub fn ensure_open(&mut self, tile: &TileMeta) -> Result<(), ElevationError> {
        if !self.rasters.contains_key(tile) {
            debug!("opening raster {:?}", tile.path);
            let handle = self.opener.open(tile)?;
            self.rasters.insert(tile.clone(), handle);
        }
        Ok(())
    }

    /// Open handle for `tile`, if this query opened it.
    pub fn handle(&self, tile: &TileMeta) -> Option<&dyn RasterHandle> {
        self.rasters.get(tile).map(|handle| handle.as_ref())
    }

    /// Descriptors of every tile opened so far.
    pub fn tiles(&self) -> impl Iterator<Item = &TileMeta> {
        self.rasters.keys()
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}
