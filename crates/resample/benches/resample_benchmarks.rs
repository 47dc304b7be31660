//! Benchmarks for kernel evaluation and full resample passes.
//!
//! Run with: cargo bench --package resample --bench resample_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use projection::AffineTransform;
use raster_common::{PixelRect, Raster};
use resample::{BorderPolicy, Interpolation, Kernel, Resample};
use test_utils::{create_random_raster, create_temperature_raster, sample_points};

const KERNELS: [Kernel; 5] = [
    Kernel::Neighbor,
    Kernel::Bilinear,
    Kernel::BiCubic,
    Kernel::BiCubic2,
    Kernel::Lanczos { order: 3 },
];

// =============================================================================
// KERNEL BENCHMARKS
// =============================================================================

fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate");
    let source = create_temperature_raster(512, 512);
    let points = sample_points(1.0, 1.0, 511.0, 511.0, 1000, 42);
    group.throughput(Throughput::Elements(points.len() as u64));

    for kernel in KERNELS {
        let mut interp = Interpolation::new(&source, kernel, BorderPolicy::FillValue)
            .expect("valid kernel");
        group.bench_with_input(BenchmarkId::new("1000_points", kernel), &points, |b, points| {
            b.iter(|| {
                for &(x, y) in points {
                    black_box(interp.interpolate(black_box(x), black_box(y), 0));
                }
            });
        });
    }

    group.finish();
}

fn bench_interpolate_all_bands(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate_all_bands");
    let source = create_random_raster(PixelRect::from_size(256, 256), 4, 0.0, 255.0, 7);
    let points = sample_points(1.0, 1.0, 255.0, 255.0, 1000, 43);
    let mut out = vec![0.0; 4];

    for kernel in [Kernel::Bilinear, Kernel::BiCubic] {
        let mut interp = Interpolation::new(&source, kernel, BorderPolicy::FillValue)
            .expect("valid kernel");
        group.bench_function(BenchmarkId::new("4_bands", kernel), |b| {
            b.iter(|| {
                for &(x, y) in &points {
                    interp.interpolate_into(x, y, &mut out).expect("band count");
                    black_box(&out);
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// RESAMPLE BENCHMARKS
// =============================================================================

fn bench_fill_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_image");
    let source = create_temperature_raster(1024, 1024);

    for size in [256i64, 512] {
        let scale = 1024.0 / size as f64;
        let transform = AffineTransform::scale(scale, scale);
        group.throughput(Throughput::Elements((size * size) as u64));

        for kernel in [Kernel::Neighbor, Kernel::Bilinear, Kernel::BiCubic2] {
            group.bench_with_input(
                BenchmarkId::new(format!("{kernel}"), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        let destination = Raster::<f32>::new(PixelRect::from_size(size, size), 1)
                            .expect("valid destination");
                        let mut resample = Resample::new(
                            &transform,
                            &source,
                            destination,
                            None,
                            kernel,
                            vec![f64::NAN],
                            BorderPolicy::FillValue,
                        )
                        .expect("valid resample");
                        black_box(resample.fill_image())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_fill_image_px(c: &mut Criterion) {
    let source = create_random_raster(PixelRect::from_size(512, 512), 3, 0.0, 255.0, 9);
    let transform = AffineTransform::scale(2.0, 2.0);

    c.bench_function("fill_image_px_rgb_256", |b| {
        b.iter(|| {
            let destination =
                Raster::<u8>::new(PixelRect::from_size(256, 256), 3).expect("valid destination");
            let mut resample = Resample::new(
                &transform,
                &source,
                destination,
                None,
                Kernel::Bilinear,
                vec![0.0; 3],
                BorderPolicy::FillValue,
            )
            .expect("valid resample");
            black_box(resample.fill_image_px())
        });
    });
}

criterion_group!(
    benches,
    bench_interpolate,
    bench_interpolate_all_bands,
    bench_fill_image,
    bench_fill_image_px,
);
criterion_main!(benches);
