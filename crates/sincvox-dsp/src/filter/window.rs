//! Window functions for FIR design.

use std::f64::consts::PI;

/// Symmetric Hann window of `len` samples.
///
/// `w[n] = 0.5 - 0.5 cos(2πn / (len - 1))` for `n` in `0..len`. Both ends are
/// zero and the center of an odd-length window is exactly one. A window of
/// length 1 is `[1.0]`; length 0 yields an empty vector.
pub fn hann_window(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / denom).cos())
                .collect()
        }
    }
}
