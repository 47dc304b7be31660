//! Pixel source/sink contracts and an in-memory raster implementing both.

use num_traits::{Bounded, NumCast};

use crate::{PixelRect, RasterError, RasterResult};

/// Numeric sample type stored in a [`Raster`].
///
/// Conversion from `f64` clamps to the representable range; integer types
/// round to nearest.
pub trait Sample: Copy + Default + Send + Sync + Bounded + NumCast + 'static {
    /// Whether values are rounded when written.
    const INTEGRAL: bool;

    /// Representable range as `f64`.
    fn value_range() -> (f64, f64) {
        let lo = num_traits::cast::<Self, f64>(Self::min_value()).unwrap_or(f64::NEG_INFINITY);
        let hi = num_traits::cast::<Self, f64>(Self::max_value()).unwrap_or(f64::INFINITY);
        (lo, hi)
    }

    /// Widen to `f64`.
    fn to_f64(self) -> f64 {
        num_traits::cast::<Self, f64>(self).unwrap_or(f64::NAN)
    }

    /// Narrow from `f64`, clamping into range.
    fn from_f64(value: f64) -> Self {
        let (lo, hi) = Self::value_range();
        let value = if Self::INTEGRAL { value.round() } else { value };
        num_traits::cast::<f64, Self>(value.clamp(lo, hi)).unwrap_or_default()
    }
}

macro_rules! impl_sample {
    ($($t:ty => $integral:expr),* $(,)?) => {
        $(impl Sample for $t {
            const INTEGRAL: bool = $integral;
        })*
    };
}

impl_sample!(
    u8 => true,
    u16 => true,
    i16 => true,
    u32 => true,
    i32 => true,
    f32 => false,
    f64 => false,
);

/// Random-access sample getter.
///
/// `sample` is only called with coordinates inside `bounds()`.
pub trait PixelSource {
    /// Pixel extent of the source.
    fn bounds(&self) -> PixelRect;

    /// Number of bands per pixel.
    fn num_bands(&self) -> usize;

    /// Value of `band` at integer pixel `(x, y)`.
    fn sample(&self, band: usize, x: i64, y: i64) -> f64;

    /// Declared `[min, max]` of `band`.
    fn range(&self, band: usize) -> (f64, f64);
}

/// Random-access sample setter, the write counterpart of [`PixelSource`].
pub trait PixelSink {
    /// Pixel extent of the sink.
    fn bounds(&self) -> PixelRect;

    /// Number of bands per pixel.
    fn num_bands(&self) -> usize;

    /// Representable numeric range of the stored sample type.
    fn value_range(&self) -> (f64, f64);

    /// Write `value` into `band` at integer pixel `(x, y)`.
    fn set_sample(&mut self, band: usize, x: i64, y: i64, value: f64);
}

/// In-memory multi-band raster.
///
/// Samples are stored pixel-interleaved in row-major order:
/// `data[((y - bounds.y) * width + (x - bounds.x)) * bands + band]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: Sample> {
    bounds: PixelRect,
    bands: usize,
    data: Vec<T>,
    declared_ranges: Option<Vec<(f64, f64)>>,
}

impl<T: Sample> Raster<T> {
    /// Create a raster filled with `T::default()`.
    pub fn new(bounds: PixelRect, bands: usize) -> RasterResult<Self> {
        bounds.validate()?;
        if bands == 0 {
            return Err(RasterError::invalid_config("a raster needs at least one band"));
        }
        Ok(Self {
            bounds,
            bands,
            data: vec![T::default(); bounds.area() * bands],
            declared_ranges: None,
        })
    }

    /// Wrap existing pixel-interleaved data.
    pub fn from_vec(bounds: PixelRect, bands: usize, data: Vec<T>) -> RasterResult<Self> {
        bounds.validate()?;
        if bands == 0 {
            return Err(RasterError::invalid_config("a raster needs at least one band"));
        }
        let expected = bounds.area() * bands;
        if data.len() != expected {
            return Err(RasterError::invalid_config(format!(
                "expected {expected} samples for {bounds} with {bands} band(s), got {}",
                data.len()
            )));
        }
        Ok(Self {
            bounds,
            bands,
            data,
            declared_ranges: None,
        })
    }

    /// Declare the per-band numeric range instead of deriving it from the data.
    pub fn with_ranges(mut self, ranges: Vec<(f64, f64)>) -> RasterResult<Self> {
        if ranges.len() != self.bands {
            return Err(RasterError::BandMismatch {
                expected: self.bands,
                actual: ranges.len(),
            });
        }
        self.declared_ranges = Some(ranges);
        Ok(self)
    }

    /// Pixel extent.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Number of bands.
    pub fn num_bands(&self) -> usize {
        self.bands
    }

    /// Raw pixel-interleaved samples.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn index(&self, band: usize, x: i64, y: i64) -> Option<usize> {
        if band >= self.bands || !self.bounds.contains_pixel(x, y) {
            return None;
        }
        let col = (x - self.bounds.x) as usize;
        let row = (y - self.bounds.y) as usize;
        Some((row * self.bounds.width as usize + col) * self.bands + band)
    }

    /// Get a sample, returning None outside the raster.
    pub fn get(&self, band: usize, x: i64, y: i64) -> Option<T> {
        self.index(band, x, y).map(|i| self.data[i])
    }

    /// Set a sample. Writes outside the raster are ignored.
    pub fn set(&mut self, band: usize, x: i64, y: i64, value: T) {
        if let Some(i) = self.index(band, x, y) {
            self.data[i] = value;
        }
    }

    /// All samples of one band in row-major order.
    pub fn band_values(&self, band: usize) -> Vec<T> {
        self.data
            .iter()
            .skip(band)
            .step_by(self.bands)
            .copied()
            .collect()
    }

    fn computed_range(&self, band: usize) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in self.data.iter().skip(band).step_by(self.bands) {
            let v = Sample::to_f64(*v);
            if v.is_nan() {
                continue;
            }
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo > hi {
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            (lo, hi)
        }
    }
}

impl<T: Sample> PixelSource for Raster<T> {
    fn bounds(&self) -> PixelRect {
        self.bounds
    }

    fn num_bands(&self) -> usize {
        self.bands
    }

    fn sample(&self, band: usize, x: i64, y: i64) -> f64 {
        match self.index(band, x, y) {
            Some(i) => Sample::to_f64(self.data[i]),
            None => f64::NAN,
        }
    }

    fn range(&self, band: usize) -> (f64, f64) {
        match &self.declared_ranges {
            Some(ranges) => ranges[band],
            None => self.computed_range(band),
        }
    }
}

impl<T: Sample> PixelSink for Raster<T> {
    fn bounds(&self) -> PixelRect {
        self.bounds
    }

    fn num_bands(&self) -> usize {
        self.bands
    }

    fn value_range(&self) -> (f64, f64) {
        T::value_range()
    }

    fn set_sample(&mut self, band: usize, x: i64, y: i64, value: f64) {
        self.set(band, x, y, T::from_f64(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_conversion_clamps() {
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-4.0), 0);
        assert_eq!(u8::from_f64(1.5), 2);
        assert_eq!(u16::from_f64(70000.0), 65535);
        assert_eq!(i16::from_f64(-40000.0), i16::MIN);
        assert_eq!(f32::from_f64(0.25), 0.25);
        assert_eq!(f64::from_f64(-1e300), -1e300);
        assert_eq!(u8::value_range(), (0.0, 255.0));
    }

    #[test]
    fn test_from_vec_checks_length() {
        let err = Raster::<f32>::from_vec(PixelRect::from_size(2, 2), 1, vec![0.0; 3]);
        assert!(matches!(err, Err(RasterError::InvalidConfig(_))));
        assert!(Raster::<f32>::new(PixelRect::from_size(2, 2), 0).is_err());
    }

    #[test]
    fn test_new_rejects_overflowing_bounds() {
        let bounds = PixelRect::new(i64::MAX - 1, 0, 3, 3);
        let err = Raster::<f64>::new(bounds, 1);
        assert!(matches!(err, Err(RasterError::InvalidDomain(_))));
    }

    #[test]
    fn test_interleaved_access() {
        let bounds = PixelRect::new(10, 20, 2, 2);
        let data = vec![1u8, 10, 2, 20, 3, 30, 4, 40];
        let raster = Raster::from_vec(bounds, 2, data).unwrap();

        assert_eq!(raster.get(0, 10, 20), Some(1));
        assert_eq!(raster.get(1, 11, 20), Some(20));
        assert_eq!(raster.get(0, 10, 21), Some(3));
        assert_eq!(raster.get(1, 11, 21), Some(40));
        assert_eq!(raster.get(0, 12, 21), None);
        assert_eq!(raster.band_values(1), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_source_range() {
        let raster =
            Raster::from_vec(PixelRect::from_size(3, 1), 1, vec![4.0f64, -2.0, f64::NAN]).unwrap();
        assert_eq!(raster.range(0), (-2.0, 4.0));

        let ints = Raster::from_vec(PixelRect::from_size(3, 1), 1, vec![7u8, 200, 3]).unwrap();
        assert_eq!(ints.range(0), (3.0, 200.0));

        let declared = raster.with_ranges(vec![(-10.0, 10.0)]).unwrap();
        assert_eq!(declared.range(0), (-10.0, 10.0));
    }

    #[test]
    fn test_sink_writes_clamped() {
        let mut raster = Raster::<u8>::new(PixelRect::from_size(1, 1), 1).unwrap();
        raster.set_sample(0, 0, 0, 512.7);
        assert_eq!(raster.get(0, 0, 0), Some(255));
        assert_eq!(PixelSink::value_range(&raster), (0.0, 255.0));
    }
}
