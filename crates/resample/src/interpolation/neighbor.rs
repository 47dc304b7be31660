//! Nearest-neighbor selection.

/// Index of the pixel containing continuous coordinate `x`, clamped to
/// `[min, max)`.
///
/// Pixel `i` covers `[i, i + 1)`, so this is `floor(x)`. On index coordinates
/// (`u = x - 0.5`) that is `floor(u + 0.5)`: half-integer ties go up for
/// negative coordinates too.
pub fn nearest_index(x: f64, min: i64, max: i64) -> i64 {
    let i = x.floor();
    if !(i > min as f64) {
        min
    } else if i >= (max - 1) as f64 {
        max - 1
    } else {
        i as i64
    }
}

/// Pick the window sample nearest to `t`.
///
/// `t0` is the index of `values[0]`.
pub fn interpolate_1d(t0: f64, t: f64, values: &[f64]) -> f64 {
    let last = values.len().saturating_sub(1);
    let offset = (t - t0 + 0.5).floor();
    let i = if offset <= 0.0 {
        0
    } else if offset >= last as f64 {
        last
    } else {
        offset as usize
    };
    values.get(i).copied().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_index_covers_pixel() {
        assert_eq!(nearest_index(0.0, 0, 3), 0);
        assert_eq!(nearest_index(0.99, 0, 3), 0);
        assert_eq!(nearest_index(1.0, 0, 3), 1);
        assert_eq!(nearest_index(2.5, 0, 3), 2);
    }

    #[test]
    fn test_nearest_index_clamps() {
        assert_eq!(nearest_index(-4.0, 0, 3), 0);
        assert_eq!(nearest_index(17.0, 0, 3), 2);
        assert_eq!(nearest_index(f64::INFINITY, -2, 2), 1);
        assert_eq!(nearest_index(f64::NAN, -2, 2), -2);
    }

    #[test]
    fn test_nearest_index_negative_ties() {
        // Pixel -1 covers [-1, 0): its center -0.5 and everything up to 0.
        assert_eq!(nearest_index(-0.5, -10, 10), -1);
        assert_eq!(nearest_index(-1.0, -10, 10), -1);
        assert_eq!(nearest_index(-1.01, -10, 10), -2);
    }

    #[test]
    fn test_interpolate_1d_rounds_half_up() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(interpolate_1d(4.0, 4.49, &values), 10.0);
        assert_eq!(interpolate_1d(4.0, 4.5, &values), 20.0);
        assert_eq!(interpolate_1d(4.0, 9.0, &values), 30.0);
        assert_eq!(interpolate_1d(4.0, -9.0, &values), 10.0);
    }
}
