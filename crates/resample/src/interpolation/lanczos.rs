//! Windowed-sinc (Lanczos) kernel.

use std::f64::consts::PI;

/// `L(x) = N·sin(πx)·sin(πx/N) / (πx)²` for `0 < |x| < N`, `L(0) = 1`,
/// zero elsewhere.
pub fn weight(x: f64, order: usize) -> f64 {
    let n = order as f64;
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= n {
        return 0.0;
    }
    let px = PI * x;
    n * px.sin() * (px / n).sin() / (px * px)
}

/// Normalized Lanczos sum over the window, `t0` being the index of
/// `values[0]`.
///
/// Weights are divided by their sum so that flat data stays flat.
pub fn interpolate_1d(order: usize, t0: f64, t: f64, values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut weights = 0.0;
    for (k, &f) in values.iter().enumerate() {
        let w = weight(t - (t0 + k as f64), order);
        sum += w * f;
        weights += w;
    }
    if weights.abs() < f64::EPSILON {
        return super::neighbor::interpolate_1d(t0, t, values);
    }
    sum / weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_shape() {
        assert_eq!(weight(0.0, 3), 1.0);
        for k in 1..3 {
            assert!(weight(k as f64, 3).abs() < 1e-15);
            assert!(weight(-(k as f64), 3).abs() < 1e-15);
        }
        assert_eq!(weight(3.0, 3), 0.0);
        assert_eq!(weight(-4.5, 3), 0.0);
        assert!((weight(0.5, 3) - weight(-0.5, 3)).abs() < 1e-15);
        assert!(weight(1.5, 3) < 0.0);
    }

    #[test]
    fn test_exact_at_samples() {
        let values = [3.0, -1.0, 4.0, 1.0, 5.0, 9.0];
        for (k, &f) in values.iter().enumerate() {
            let v = interpolate_1d(3, -2.0, -2.0 + k as f64, &values);
            assert!((v - f).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_stays_flat() {
        let values = [2.5; 4];
        for t in [0.1, 0.5, 1.37, 2.9] {
            assert!((interpolate_1d(2, 0.0, t, &values) - 2.5).abs() < 1e-12);
        }
    }
}
