//! Linear interpolation between two samples.

/// `f0 + (t - t0)(f1 - f0)`, where `t0` is the index of `values[0]`.
pub fn interpolate_1d(t0: f64, t: f64, values: &[f64]) -> f64 {
    let f0 = values[0];
    let f1 = values[1];
    f0 + (t - t0) * (f1 - f0)
}
