//! Resampling through a cached approximation instead of the exact transform.

use std::sync::Arc;

use projection::Transform;
use raster_common::{PixelRect, Raster};
use resample::{BorderPolicy, Kernel, Resample};
use test_utils::{create_test_raster, domains, quadratic_warp};
use warp_grid::{ApproximationCache, WarpConfig};

fn resample_with(transform: &dyn Transform, source: &Raster<f64>) -> (Raster<f64>, usize) {
    let destination = Raster::<f64>::new(domains::TILE, 1).unwrap();
    let mut resample = Resample::new(
        transform,
        source,
        destination,
        None,
        Kernel::Bilinear,
        vec![f64::NAN],
        BorderPolicy::FillValue,
    )
    .unwrap();
    let stats = resample.fill_image();
    (resample.into_destination(), stats.interpolated)
}

#[test]
fn test_cached_warp_matches_exact_resample() {
    // Values are linear in the pixel position, so bilinear output differs
    // only by where each pixel lands.
    let source = create_test_raster(400, 400, 1);
    let transform: Arc<dyn Transform> = Arc::new(quadratic_warp());
    let tolerance = 0.1;
    let cache = ApproximationCache::new(WarpConfig::with_tolerance(tolerance)).unwrap();
    let warp = cache.get_or_build(transform.clone(), domains::TILE).unwrap();
    assert!(warp.is_grid());

    let (exact, exact_count) = resample_with(transform.as_ref(), &source);
    let (approx, approx_count) = resample_with(&*warp, &source);
    let total = domains::TILE.area();
    assert!(exact_count > total * 99 / 100);
    assert!(approx_count > total * 99 / 100);

    // One pixel of displacement in x changes the value by 1000.
    let bound = 1001.0 * 2.0 * tolerance;
    let mut compared = 0;
    for y in 0..256 {
        for x in 0..256 {
            let a = exact.get(0, x, y).unwrap();
            let b = approx.get(0, x, y).unwrap();
            if a.is_finite() && b.is_finite() {
                assert!((a - b).abs() <= bound, "pixel ({x}, {y}): {a} vs {b}");
                compared += 1;
            }
        }
    }
    assert!(compared > 60_000);
}

#[test]
fn test_affine_warp_reproduces_exact_output() {
    let source = create_test_raster(64, 64, 1);
    let transform: Arc<dyn Transform> =
        Arc::new(projection::AffineTransform::new([0.25, 0.0, 0.0, 0.0, 0.25, 0.0]));
    let cache = ApproximationCache::new(WarpConfig::default()).unwrap();
    let warp = cache.get_or_build(transform.clone(), domains::TILE).unwrap();
    assert!(warp.is_affine());

    let (exact, _) = resample_with(transform.as_ref(), &source);
    let (approx, _) = resample_with(&*warp, &source);
    for y in 0..256 {
        for x in 0..256 {
            let a = exact.get(0, x, y).unwrap();
            let b = approx.get(0, x, y).unwrap();
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    // The second lookup is served from the cache.
    let again = cache
        .get_or_build(transform, PixelRect::from_size(256, 256))
        .unwrap();
    assert!(Arc::ptr_eq(&warp, &again));
    assert_eq!(cache.stats().hits, 1);
}
