use criterion::{criterion_group, criterion_main, Criterion};
use demtile::{
    BoundingBox, GeoPoint, GridRaster, RasterFormat, RasterHandle, RasterOpener, TileError,
    TileMeta,
};
use elevation::{ElevationService, InterpolationMode};
use std::path::PathBuf;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Serves deterministic synthetic terrain, no files involved.
struct SyntheticOpener;

impl RasterOpener for SyntheticOpener {
    fn open(&self, tile: &TileMeta) -> Result<Box<dyn RasterHandle>, TileError> {
        let raster = GridRaster::from_fn(tile.width, tile.height, |x, y| {
            ((x * 7 + y * 13) % 997) as f32
        });
        Ok(Box::new(raster))
    }
}

fn tile(name: &str, origin_lat: f64, origin_lon: f64) -> TileMeta {
    TileMeta {
        path: PathBuf::from(name),
        format: RasterFormat::Hgt,
        origin_lat,
        origin_lon,
        pixel_size_x: 0.002,
        pixel_size_y: -0.002,
        width: 500,
        height: 500,
        no_data: -32768.0,
    }
}

fn service() -> ElevationService<SyntheticOpener> {
    let catalog = vec![
        tile("n00e000", 1.0, 0.0),
        tile("n00e001", 1.0, 1.0),
        tile("n01e000", 2.0, 0.0),
        tile("n01e001", 2.0, 1.0),
    ];
    ElevationService::new(catalog, SyntheticOpener)
}

fn line_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Profile");
    let service = service();
    let start = GeoPoint::new(0.2513, 0.5007);
    let end = GeoPoint::new(1.7513, 1.5007);

    for mode in [InterpolationMode::Bilinear, InterpolationMode::Hyperbolic] {
        group.bench_with_input(
            format!("four tiles {mode:?}"),
            &(&service, &start, &end, mode),
            |b, (service, start, end, mode)| b.iter(|| service.line_profile(start, end, *mode)),
        );
    }
}

fn height_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("Height Map");
    let service = service();
    let bbox = BoundingBox::new(0.25, 1.75, 0.25, 1.75);

    group.bench_with_input("four tile mosaic", &(&service, bbox), |b, (service, bbox)| {
        b.iter(|| service.height_map(bbox))
    });
}

criterion_group!(benches, line_profile, height_map);
criterion_main!(benches);
