//! Elevation extraction over DEM raster tile sets.
//!
//! The engine answers point, batch, line-profile and height-map queries
//! against a catalog of [`TileMeta`](demtile::TileMeta) descriptors,
//! reading samples through the [`RasterOpener`](demtile::RasterOpener)
//! trait. A line profile is sampled at every raster grid-line crossing,
//! so it carries the full resolution of the underlying data.
//!
//! [`ElevationService`] is the front end; the submodules are public for
//! callers that want to drive the pipeline stages directly.

mod cache;
pub mod catalog;
mod error;
pub mod export;
#[cfg(test)]
mod fixtures;
mod interpolate;
pub mod intersect;
pub mod metrics;
pub mod mosaic;
mod sampler;
mod service;

pub use crate::{
    cache::RasterCache,
    error::ElevationError,
    interpolate::{BilinearInterpolator, HyperbolicInterpolator, InterpolationMode, Interpolator},
    metrics::ElevationMetrics,
    sampler::{ElevationSampler, NO_DATA_OUT},
    service::ElevationService,
};
