//! Query orchestration.

use crate::{
    catalog, intersect, metrics, mosaic,
    sampler::{ElevationSampler, NO_DATA_OUT},
    ElevationError, InterpolationMode, RasterCache,
};
use demtile::{BoundingBox, GeoPoint, HeightMap, RasterOpener, TileMeta};
use geo::geometry::{Geometry, LineString};
use log::{debug, warn};

/// Elevation query front end over a tile catalog and a raster opener.
///
/// Every query builds its own [`RasterCache`], so concurrent queries
/// never contend and raster handles are released when the query returns,
/// on the error path included.
pub struct ElevationService<O> {
    catalog: Vec<TileMeta>,
    opener: O,
}

impl<O: RasterOpener> ElevationService<O> {
    pub fn new(catalog: Vec<TileMeta>, opener: O) -> Self {
        Self { catalog, opener }
    }

    pub fn catalog(&self) -> &[TileMeta] {
        &self.catalog
    }

    /// Elevation profile along the segment from `start` to `end`,
    /// sampled at every raster grid-line crossing and at both endpoints.
    pub fn line_profile(
        &self,
        start: &GeoPoint,
        end: &GeoPoint,
        mode: InterpolationMode,
    ) -> Result<Vec<GeoPoint>, ElevationError> {
        self.profile(&[start.clone(), end.clone()], mode)
    }

    /// Elevation profile along a multi-vertex line. Interior vertices
    /// appear once in the result.
    pub fn line_string_profile(
        &self,
        line: &LineString<f64>,
        mode: InterpolationMode,
    ) -> Result<Vec<GeoPoint>, ElevationError> {
        let vertices: Vec<GeoPoint> = line.coords().map(|coord| GeoPoint::from(*coord)).collect();
        self.profile(&vertices, mode)
    }

    /// Profile for line-like geometries; anything else is rejected. A
    /// multi-part line is reduced to its longest part.
    pub fn geometry_profile(
        &self,
        geometry: &Geometry<f64>,
        mode: InterpolationMode,
    ) -> Result<Vec<GeoPoint>, ElevationError> {
        match geometry {
            Geometry::LineString(line) => self.line_string_profile(line, mode),
            Geometry::Line(line) => self.line_profile(
                &GeoPoint::from(line.start),
                &GeoPoint::from(line.end),
                mode,
            ),
            Geometry::MultiLineString(multi) => {
                let Some(longest) = multi.0.iter().max_by_key(|line| line.0.len()) else {
                    return Err(ElevationError::InvalidGeometry("empty multi-linestring"));
                };
                if multi.0.len() > 1 {
                    warn!(
                        "multi-part line: profiling the longest of {} parts",
                        multi.0.len()
                    );
                }
                self.line_string_profile(longest, mode)
            }
            _ => Err(ElevationError::InvalidGeometry(
                "only line geometries have an elevation profile",
            )),
        }
    }

    /// Elevation at one location. `elevation` stays unset when no
    /// catalog tile covers it.
    ///
    /// Opens every tile within interpolation reach of the point, so a
    /// lookup right next to a tile edge can read across it.
    pub fn point_elevation(
        &self,
        lat: f64,
        lon: f64,
        mode: InterpolationMode,
    ) -> Result<GeoPoint, ElevationError> {
        let mut point = GeoPoint::new(lat, lon);
        let mut cache = RasterCache::new(&self.opener);
        for tile in self.catalog.iter().filter(|tile| tile.is_adjacent_to(&point)) {
            cache.ensure_open(tile)?;
        }
        self.fill_elevations(&cache, std::slice::from_mut(&mut point), mode)?;
        Ok(point)
    }

    /// Resolves elevations for `points` in place, preserving the input
    /// order. Points outside coverage are left unresolved.
    pub fn points_elevation(
        &self,
        points: &mut [GeoPoint],
        mode: InterpolationMode,
    ) -> Result<(), ElevationError> {
        let Some(bbox) = BoundingBox::of_points(points.iter()) else {
            return Ok(());
        };
        let mut cache = RasterCache::new(&self.opener);
        for tile in catalog::covering_tiles(&self.catalog, &bbox) {
            cache.ensure_open(tile)?;
        }
        self.fill_elevations(&cache, points, mode)
    }

    /// Height grid mosaic of the catalog clipped to `bbox`.
    pub fn height_map(&self, bbox: &BoundingBox) -> Result<HeightMap, ElevationError> {
        let mut cache = RasterCache::new(&self.opener);
        let tiles = catalog::covering_tiles(&self.catalog, bbox);
        let mut maps = Vec::with_capacity(tiles.len());
        for tile in tiles {
            cache.ensure_open(tile)?;
            let handle = cache
                .handle(tile)
                .ok_or_else(|| ElevationError::TileNotInCache(tile.path.clone()))?;
            maps.push(handle.height_map(tile, bbox, NO_DATA_OUT));
        }
        Ok(mosaic::merge(bbox, maps))
    }

    /// Full-extent height grid for one tile.
    pub fn tile_height_map(&self, tile: &TileMeta) -> Result<HeightMap, ElevationError> {
        let handle = self.opener.open(tile)?;
        Ok(handle.height_map(tile, &tile.bounding_box(), NO_DATA_OUT))
    }

    fn profile(
        &self,
        vertices: &[GeoPoint],
        mode: InterpolationMode,
    ) -> Result<Vec<GeoPoint>, ElevationError> {
        if vertices.len() < 2 {
            return Err(ElevationError::InvalidGeometry(
                "a profile needs at least two points",
            ));
        }
        let bbox = BoundingBox::of_points(vertices).ok_or(ElevationError::InvalidGeometry(
            "a profile needs at least two points",
        ))?;

        let mut cache = RasterCache::new(&self.opener);
        for tile in catalog::covering_tiles(&self.catalog, &bbox) {
            cache.ensure_open(tile)?;
        }

        let mut points = Vec::new();
        for (index, pair) in vertices.windows(2).enumerate() {
            let Some(seg_bbox) = BoundingBox::of_points(pair) else {
                continue;
            };
            let seg_tiles: Vec<&TileMeta> = cache
                .tiles()
                .filter(|tile| tile.intersects(&seg_bbox))
                .collect();
            let crossings =
                intersect::segment_intersections(&pair[0], &pair[1], &seg_tiles, index == 0, true)?;
            points.extend(crossings);
        }

        self.fill_elevations(&cache, &mut points, mode)?;
        metrics::accumulate_distances(&mut points);
        debug!("profile sampled {} points", points.len());
        Ok(points)
    }

    fn fill_elevations(
        &self,
        cache: &RasterCache,
        points: &mut [GeoPoint],
        mode: InterpolationMode,
    ) -> Result<(), ElevationError> {
        let mut sampler = ElevationSampler::new(cache, mode);
        // Points on a shared tile edge stay with the tile already in
        // hand, so a profile switches tiles only when it must.
        let mut current: Option<&TileMeta> = None;
        for point in points.iter_mut() {
            let tile = match current {
                Some(tile) if tile.contains(point) => Some(tile),
                _ => cache.tiles().find(|tile| tile.contains(point)),
            };
            match tile {
                Some(tile) => {
                    sampler.sample_into(tile, point)?;
                    current = Some(tile);
                }
                None => warn!("no coverage for {point}, leaving elevation unset"),
            }
        }
        Ok(())
    }
}
