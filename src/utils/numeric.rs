//! Tolerance-based comparison of plain numbers.

/// Compare two numbers with a relative tolerance.
///
/// Differences below machine epsilon always compare equal, so values such as
/// `1e-17` are treated as zero. NaN never equals anything, and infinities
/// only equal themselves.
pub fn nearly_equal(x: f64, y: f64, epsilon: f64) -> bool {
    if x == y {
        return true;
    }
    if x.is_nan() || y.is_nan() || !x.is_finite() || !y.is_finite() {
        return false;
    }
    let diff = (x - y).abs();
    if diff < f64::EPSILON {
        return true;
    }
    diff <= x.abs().max(y.abs()) * epsilon
}
