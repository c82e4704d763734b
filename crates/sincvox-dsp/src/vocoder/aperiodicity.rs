//! Per-bin aperiodicity from voicing strength.

use super::f0::PitchFrame;

/// Lower bound on aperiodicity so no band is perfectly periodic.
const MIN_APERIODICITY: f64 = 0.001;

/// Shape of the rise toward pure noise at Nyquist.
const RISE_EXPONENT: f64 = 2.0;

/// Builds one aperiodicity row per frame.
///
/// Voiced frames start at `1 - periodicity` at DC and rise toward 1.0 at
/// Nyquist; unvoiced frames are 1.0 everywhere.
pub(crate) fn estimate(track: &[PitchFrame], bins: usize) -> Vec<Vec<f64>> {
    let top = bins.saturating_sub(1).max(1) as f64;
    track
        .iter()
        .map(|frame| {
            if frame.f0 <= 0.0 {
                return vec![1.0; bins];
            }
            let base = (1.0 - frame.periodicity).clamp(MIN_APERIODICITY, 1.0);
            (0..bins)
                .map(|k| {
                    let rise = (k as f64 / top).powf(RISE_EXPONENT);
                    (base + (1.0 - base) * rise).clamp(MIN_APERIODICITY, 1.0)
                })
                .collect()
        })
        .collect()
}
