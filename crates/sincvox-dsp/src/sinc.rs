//! Unnormalized sinc function.

/// Evaluates `sin(x) / x`, returning exactly `1.0` at `x == 0.0`.
///
/// # Example
/// ```
/// use sincvox_dsp::sinc::sinc;
///
/// assert_eq!(sinc(0.0), 1.0);
/// assert!(sinc(std::f64::consts::PI).abs() < 1e-15);
/// ```
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}
