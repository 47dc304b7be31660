//! Four-tap cubic kernels.
//!
//! Both kernels place the interpolated position between the second and third
//! window samples: with `t0` the index of `values[0]`, the local coordinate is
//! `x = t - (t0 + 1)`, normally in `[0, 1)`.

/// Lagrange cubic through the four window samples.
pub fn lagrange_1d(t0: f64, t: f64, values: &[f64]) -> f64 {
    let (f0, f1, f2, f3) = (values[0], values[1], values[2], values[3]);
    let x = t - (t0 + 1.0);

    let a1 = f2 - f0 / 3.0 - f1 / 2.0 - f3 / 6.0;
    let a2 = (f0 + f2) / 2.0 - f1;
    let a3 = (f3 - f0) / 6.0 + (f1 - f2) / 2.0;

    f1 + x * (a1 + x * (a2 + x * a3))
}

/// Catmull-Rom cubic convolution through the four window samples.
pub fn catmull_rom_1d(t0: f64, t: f64, values: &[f64]) -> f64 {
    cubic_1d(values[0], values[1], values[2], values[3], t - (t0 + 1.0))
}

/// 1D cubic interpolation using Catmull-Rom spline.
fn cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    // Catmull-Rom coefficients
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}
