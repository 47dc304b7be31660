//! Benchmarks for building, caching and evaluating warp approximations.
//!
//! Run with: cargo bench --package warp-grid --bench warp_benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use projection::{AffineTransform, Transform};
use raster_common::PixelRect;
use test_utils::{domains, quadratic_warp, Opaque};
use warp_grid::{ApproximationCache, WarpBuilder, WarpConfig};

// =============================================================================
// BUILD BENCHMARKS
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let affine = AffineTransform::new([0.9, 0.1, 3.0, -0.1, 0.9, 7.0]);
    let transforms: [(&str, Arc<dyn Transform>); 3] = [
        ("affine", Arc::new(affine)),
        ("fitted_affine", Arc::new(Opaque(affine))),
        ("quadratic", Arc::new(quadratic_warp())),
    ];

    for tolerance in [0.1, 0.5] {
        let builder = WarpBuilder::new(WarpConfig::with_tolerance(tolerance)).expect("valid config");
        for (name, transform) in &transforms {
            group.bench_with_input(
                BenchmarkId::new(*name, tolerance),
                transform,
                |b, transform| {
                    b.iter(|| {
                        black_box(builder.build(transform.clone(), domains::TILE).expect("build"))
                    });
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// CACHE BENCHMARKS
// =============================================================================

fn bench_cache_hit(c: &mut Criterion) {
    let cache = ApproximationCache::new(WarpConfig::default()).expect("valid config");
    let transform: Arc<dyn Transform> = Arc::new(quadratic_warp());
    cache
        .get_or_build(transform.clone(), domains::TILE)
        .expect("build");

    c.bench_function("cache_hit", |b| {
        b.iter(|| black_box(cache.get_or_build(transform.clone(), domains::TILE).expect("hit")));
    });
}

// =============================================================================
// EVALUATION BENCHMARKS
// =============================================================================

fn bench_map_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_rect_batch");
    let transform: Arc<dyn Transform> = Arc::new(quadratic_warp());
    let builder = WarpBuilder::new(WarpConfig::default()).expect("valid config");
    let grid = builder.build(transform.clone(), domains::TILE).expect("build");
    let pointwise = warp_grid::WarpApproximation::Pointwise(transform);
    let rect = PixelRect::from_size(256, 256);
    group.throughput(Throughput::Elements(rect.area() as u64));

    for (name, warp) in [("grid", &grid), ("pointwise", &pointwise)] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(warp.map_rect_batch(black_box(rect), 1, 1).expect("map")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_cache_hit, bench_map_rect);
criterion_main!(benches);
