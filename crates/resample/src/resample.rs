//! Transform-driven resampling of a pixel source into a pixel sink.

use projection::{Point2, Transform};
use raster_common::{PixelRect, PixelSink, PixelSource, Raster, RasterError, Sample};
use tracing::{debug, trace};

use crate::config::ResampleConfig;
use crate::error::{ResampleError, Result};
use crate::interpolation::{Interpolation, Kernel};
use crate::types::{BorderPolicy, ResampleStats};

/// Round-off tolerated when rounding a mapped envelope to whole pixels.
const ENVELOPE_EPSILON: f64 = 1e-9;

/// Where a destination pixel center lands in the source.
enum Located {
    /// Interpolate at this (clamped) source coordinate.
    Source(f64, f64),
    /// Outside the source, or outside the exact-fit region.
    Outside,
    /// The transform failed for this pixel.
    Failed,
}

/// Resamples a source through a destination-to-source transform.
///
/// Destination pixels are visited row by row, top to bottom. Each pixel
/// center is mapped to the source; pixels that land outside the source (or,
/// unless the border policy is `Extrapolation`, outside its exact-fit region)
/// get the fill value. Interpolated values are clamped to the destination's
/// representable range.
pub struct Resample<'a, S: PixelSource + ?Sized, D: PixelSink> {
    transform: &'a dyn Transform,
    interpolation: Interpolation<'a, S>,
    destination: D,
    area: PixelRect,
    fill_values: Vec<f64>,
}

impl<'a, S: PixelSource + ?Sized, D: PixelSink> Resample<'a, S, D> {
    /// Resample into a caller-supplied destination.
    ///
    /// # Arguments
    /// * `transform` - Destination to source mapping
    /// * `source` - Pixel source
    /// * `destination` - Pixel sink with the same band count as the source
    /// * `area` - Destination sub-region to fill, the whole sink when `None`
    /// * `kernel` - Interpolation kernel
    /// * `fill_values` - One value per band
    /// * `border` - Border policy; `Crop` is rejected here
    pub fn new(
        transform: &'a dyn Transform,
        source: &'a S,
        destination: D,
        area: Option<PixelRect>,
        kernel: Kernel,
        fill_values: Vec<f64>,
        border: BorderPolicy,
    ) -> Result<Self> {
        if border == BorderPolicy::Crop {
            return Err(ResampleError::unsupported_border(
                "crop requires a destination sized by the resampler",
            ));
        }
        Self::assemble(transform, source, destination, area, kernel, fill_values, border)
    }

    /// Resample into a caller-supplied destination using `config`.
    pub fn from_config(
        transform: &'a dyn Transform,
        source: &'a S,
        destination: D,
        config: &ResampleConfig,
    ) -> Result<Self> {
        let fill_values = config.fill_values(source.num_bands());
        Self::new(
            transform,
            source,
            destination,
            None,
            config.kernel()?,
            fill_values,
            config.border,
        )
    }

    fn assemble(
        transform: &'a dyn Transform,
        source: &'a S,
        destination: D,
        area: Option<PixelRect>,
        kernel: Kernel,
        fill_values: Vec<f64>,
        border: BorderPolicy,
    ) -> Result<Self> {
        let interpolation = Interpolation::new(source, kernel, border)?;
        let bands = interpolation.num_bands();

        if destination.num_bands() != bands {
            return Err(RasterError::BandMismatch {
                expected: bands,
                actual: destination.num_bands(),
            }
            .into());
        }
        if fill_values.len() != bands {
            return Err(ResampleError::FillValueCount {
                expected: bands,
                actual: fill_values.len(),
            });
        }

        let bounds = destination.bounds();
        bounds.validate()?;
        let area = match area {
            Some(area) => {
                area.validate()?;
                if !bounds.contains_rect(&area) {
                    return Err(RasterError::out_of_bounds(area, bounds).into());
                }
                area
            }
            None => bounds,
        };

        Ok(Self {
            transform,
            interpolation,
            destination,
            area,
            fill_values,
        })
    }

    /// Destination region being filled.
    pub fn area(&self) -> PixelRect {
        self.area
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn into_destination(self) -> D {
        self.destination
    }

    /// Fill the destination area, interpolating one band at a time.
    pub fn fill_image(&mut self) -> ResampleStats {
        let bands = self.interpolation.num_bands();
        let mut stats = ResampleStats::default();

        for y in self.area.y..self.area.max_y() {
            for x in self.area.x..self.area.max_x() {
                stats.pixels += 1;
                match self.locate(x, y) {
                    Located::Source(sx, sy) => {
                        for band in 0..bands {
                            let value = self.interpolation.interpolate(sx, sy, band);
                            self.write(band, x, y, value);
                        }
                        stats.interpolated += 1;
                    }
                    Located::Outside => {
                        self.fill(x, y);
                        stats.filled += 1;
                    }
                    Located::Failed => {
                        self.fill(x, y);
                        stats.filled += 1;
                        stats.transform_failures += 1;
                    }
                }
            }
        }

        self.report(&stats);
        stats
    }

    /// Fill the destination area with one all-bands kernel call per pixel.
    ///
    /// Produces the same output as [`Resample::fill_image`].
    pub fn fill_image_px(&mut self) -> ResampleStats {
        let mut values = vec![0.0; self.interpolation.num_bands()];
        let mut stats = ResampleStats::default();

        for y in self.area.y..self.area.max_y() {
            for x in self.area.x..self.area.max_x() {
                stats.pixels += 1;
                match self.locate(x, y) {
                    Located::Source(sx, sy) => {
                        if self.interpolation.interpolate_into(sx, sy, &mut values).is_err() {
                            self.fill(x, y);
                            stats.filled += 1;
                            continue;
                        }
                        for (band, &value) in values.iter().enumerate() {
                            self.write(band, x, y, value);
                        }
                        stats.interpolated += 1;
                    }
                    Located::Outside => {
                        self.fill(x, y);
                        stats.filled += 1;
                    }
                    Located::Failed => {
                        self.fill(x, y);
                        stats.filled += 1;
                        stats.transform_failures += 1;
                    }
                }
            }
        }

        self.report(&stats);
        stats
    }

    fn locate(&self, x: i64, y: i64) -> Located {
        let center = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
        let mapped = match self.transform.evaluate(center) {
            Ok(p) if p.x.is_finite() && p.y.is_finite() => p,
            Ok(p) => {
                trace!(x, y, sx = p.x, sy = p.y, "transform produced a non-finite point");
                return Located::Failed;
            }
            Err(e) => {
                trace!(x, y, error = %e, "transform failed");
                return Located::Failed;
            }
        };

        let bounds = self.interpolation.bounds();
        let (min_x, max_x) = (bounds.x as f64, bounds.max_x() as f64);
        let (min_y, max_y) = (bounds.y as f64, bounds.max_y() as f64);

        let (tx, ty) = (mapped.x.trunc(), mapped.y.trunc());
        if tx < min_x || tx >= max_x || ty < min_y || ty >= max_y {
            return Located::Outside;
        }
        if !self.interpolation.check_interpolate(mapped.x, mapped.y) {
            return Located::Outside;
        }

        Located::Source(
            mapped.x.max(min_x).min(max_x),
            mapped.y.max(min_y).min(max_y),
        )
    }

    fn write(&mut self, band: usize, x: i64, y: i64, value: f64) {
        let (lo, hi) = self.destination.value_range();
        let value = if value < lo {
            lo
        } else if value > hi {
            hi
        } else {
            value
        };
        self.destination.set_sample(band, x, y, value);
    }

    fn fill(&mut self, x: i64, y: i64) {
        for (band, &value) in self.fill_values.iter().enumerate() {
            self.destination.set_sample(band, x, y, value);
        }
    }

    fn report(&self, stats: &ResampleStats) {
        debug!(
            area = %self.area,
            kernel = %self.interpolation.kernel(),
            pixels = stats.pixels,
            interpolated = stats.interpolated,
            filled = stats.filled,
            transform_failures = stats.transform_failures,
            "Resample pass complete"
        );
    }
}

impl<'a, S: PixelSource + ?Sized, T: Sample> Resample<'a, S, Raster<T>> {
    /// Resample into a destination raster sized by the resampler.
    ///
    /// The destination covers the forward image of the source envelope,
    /// rounded out to whole pixels. With `BorderPolicy::Crop` it covers only
    /// the pixels whose centers map into the exact-fit region of the source.
    /// Requires an invertible transform.
    pub fn with_auto_destination(
        transform: &'a dyn Transform,
        source: &'a S,
        kernel: Kernel,
        fill_values: Vec<f64>,
        border: BorderPolicy,
    ) -> Result<Self> {
        let bounds = source.bounds();
        bounds.validate()?;
        let forward = transform.inverse()?;

        let inset = if border == BorderPolicy::Crop { 0.5 } else { 0.0 };
        let corners = [
            (bounds.x as f64 + inset, bounds.y as f64 + inset),
            (bounds.max_x() as f64 - inset, bounds.y as f64 + inset),
            (bounds.x as f64 + inset, bounds.max_y() as f64 - inset),
            (bounds.max_x() as f64 - inset, bounds.max_y() as f64 - inset),
        ];

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (cx, cy) in corners {
            let p = forward.evaluate(Point2::new(cx, cy))?;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let area = if border == BorderPolicy::Crop {
            centers_within(min_x, min_y, max_x, max_y)?
        } else {
            PixelRect::enclosing(snap(min_x), snap(min_y), snap(max_x), snap(max_y))?
        };
        debug!(source = %bounds, destination = %area, %border, "Sized destination");

        let destination = Raster::<T>::new(area, source.num_bands())?;
        Self::assemble(transform, source, destination, None, kernel, fill_values, border)
    }
}

/// `v`, or the nearest integer when within round-off of it.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() <= ENVELOPE_EPSILON {
        r
    } else {
        v
    }
}

/// Pixels whose centers lie inside `[min_x, max_x] × [min_y, max_y]`.
fn centers_within(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<PixelRect> {
    let envelope = PixelRect::enclosing(min_x, min_y, max_x, max_y)?;
    let x0 = snap(min_x - 0.5).ceil() as i64;
    let y0 = snap(min_y - 0.5).ceil() as i64;
    let x1 = snap(max_x - 0.5).floor() as i64 + 1;
    let y1 = snap(max_y - 0.5).floor() as i64 + 1;
    let rect = PixelRect::new(x0, y0, x1 - x0, y1 - y0);
    if rect.validate().is_err() || !envelope.contains_rect(&rect) {
        return Err(RasterError::invalid_domain(format!(
            "no destination pixel center falls inside the crop region {envelope}"
        ))
        .into());
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::AffineTransform;
    use test_utils::{bump_raster, create_test_raster, domains};

    fn third() -> AffineTransform {
        AffineTransform::scale(1.0 / 3.0, 1.0 / 3.0)
    }

    #[test]
    fn test_crop_rejected_with_supplied_destination() {
        let source = bump_raster();
        let transform = third();
        let destination = Raster::<f64>::new(domains::BUMP_DESTINATION, 1).unwrap();
        let result = Resample::new(
            &transform,
            &source,
            destination,
            None,
            Kernel::Neighbor,
            vec![0.0],
            BorderPolicy::Crop,
        );
        assert!(matches!(result, Err(ResampleError::UnsupportedBorder(_))));
    }

    #[test]
    fn test_fill_value_count_checked() {
        let source = bump_raster();
        let transform = third();
        let destination = Raster::<f64>::new(domains::BUMP_DESTINATION, 1).unwrap();
        let result = Resample::new(
            &transform,
            &source,
            destination,
            None,
            Kernel::Neighbor,
            vec![0.0, 0.0],
            BorderPolicy::FillValue,
        );
        assert!(matches!(
            result,
            Err(ResampleError::FillValueCount { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_band_mismatch_checked() {
        let source = create_test_raster(4, 4, 2);
        let transform = AffineTransform::identity();
        let destination = Raster::<f64>::new(PixelRect::from_size(4, 4), 1).unwrap();
        let result = Resample::new(
            &transform,
            &source,
            destination,
            None,
            Kernel::Bilinear,
            vec![0.0, 0.0],
            BorderPolicy::FillValue,
        );
        assert!(matches!(
            result,
            Err(ResampleError::Raster(RasterError::BandMismatch { expected: 2, actual: 1 }))
        ));
    }

    #[test]
    fn test_area_must_fit_destination() {
        let source = bump_raster();
        let transform = third();
        let destination = Raster::<f64>::new(domains::BUMP_DESTINATION, 1).unwrap();
        let result = Resample::new(
            &transform,
            &source,
            destination,
            Some(PixelRect::new(5, 5, 5, 5)),
            Kernel::Neighbor,
            vec![0.0],
            BorderPolicy::FillValue,
        );
        assert!(matches!(
            result,
            Err(ResampleError::Raster(RasterError::AreaOutsideBounds { .. }))
        ));
    }

    #[test]
    fn test_sub_area_leaves_rest_untouched() {
        let source = bump_raster();
        let transform = third();
        let destination = Raster::<f64>::new(domains::BUMP_DESTINATION, 1).unwrap();
        let mut resample = Resample::new(
            &transform,
            &source,
            destination,
            Some(PixelRect::new(3, 3, 3, 3)),
            Kernel::Neighbor,
            vec![-1.0],
            BorderPolicy::FillValue,
        )
        .unwrap();
        let stats = resample.fill_image();
        assert_eq!(stats.pixels, 9);
        assert_eq!(stats.interpolated, 9);

        let out = resample.into_destination();
        assert_eq!(out.get(0, 4, 4), Some(2.0));
        assert_eq!(out.get(0, 0, 0), Some(0.0));
        assert_eq!(out.get(0, 8, 8), Some(0.0));
    }

    #[test]
    fn test_auto_destination_size() {
        let source = bump_raster();
        let transform = third();
        let resample = Resample::<_, Raster<f64>>::with_auto_destination(
            &transform,
            &source,
            Kernel::Neighbor,
            vec![0.0],
            BorderPolicy::FillValue,
        )
        .unwrap();
        assert_eq!(resample.area(), domains::BUMP_DESTINATION);
    }

    #[test]
    fn test_auto_destination_crop() {
        let source = bump_raster();
        let transform = third();
        let mut resample = Resample::<_, Raster<u8>>::with_auto_destination(
            &transform,
            &source,
            Kernel::Neighbor,
            vec![0.0],
            BorderPolicy::Crop,
        )
        .unwrap();
        assert_eq!(resample.area(), PixelRect::new(1, 1, 7, 7));

        let stats = resample.fill_image();
        assert_eq!(stats.filled, 0);
        assert_eq!(resample.destination().get(0, 4, 4), Some(2));
    }

    #[test]
    fn test_auto_destination_needs_inverse() {
        let source = bump_raster();
        let transform = test_utils::CubicWarp { k: 1.0 };
        let result = Resample::<_, Raster<f64>>::with_auto_destination(
            &transform,
            &source,
            Kernel::Neighbor,
            vec![0.0],
            BorderPolicy::FillValue,
        );
        assert!(matches!(result, Err(ResampleError::Transform(_))));
    }

    #[test]
    fn test_output_clamped_to_destination_type() {
        let data = vec![-40.0, 300.0, 128.4, 7.6];
        let source = Raster::<f64>::from_vec(PixelRect::from_size(2, 2), 1, data).unwrap();
        let transform = AffineTransform::identity();
        let destination = Raster::<u8>::new(PixelRect::from_size(2, 2), 1).unwrap();
        let mut resample = Resample::new(
            &transform,
            &source,
            destination,
            None,
            Kernel::Bilinear,
            vec![0.0],
            BorderPolicy::FillValue,
        )
        .unwrap();
        resample.fill_image();
        let out = resample.into_destination();
        assert_eq!(out.as_slice(), &[0, 255, 128, 8]);
    }

    #[test]
    fn test_from_config() {
        let source = bump_raster();
        let transform = third();
        let destination = Raster::<f64>::new(domains::BUMP_DESTINATION, 1).unwrap();
        let config = ResampleConfig {
            interpolation: crate::InterpolationMethod::Nearest,
            fill_value: 0.0,
            ..Default::default()
        };
        let mut resample = Resample::from_config(&transform, &source, destination, &config).unwrap();
        let stats = resample.fill_image();
        assert_eq!(stats.pixels, 81);
        assert_eq!(stats.filled, 32);
    }
}
