//! Filter band parameter types.

use serde::{Deserialize, Serialize};

/// Parameters for one windowed-sinc filter branch.
///
/// All frequencies are in Hz and are normalized by the signal's sample rate
/// at design time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BandParams {
    /// Low-pass filter.
    Lowpass {
        /// Cutoff frequency in Hz.
        cutoff_hz: f64,
        /// Transition bandwidth in Hz.
        transition_hz: f64,
    },
    /// High-pass filter.
    Highpass {
        /// Cutoff frequency in Hz.
        cutoff_hz: f64,
        /// Transition bandwidth in Hz.
        transition_hz: f64,
    },
    /// Band-pass filter.
    Bandpass {
        /// Lower cutoff frequency in Hz.
        low_hz: f64,
        /// Upper cutoff frequency in Hz.
        high_hz: f64,
        /// Transition bandwidth in Hz.
        transition_hz: f64,
    },
}

impl BandParams {
    /// Returns the transition bandwidth in Hz.
    pub fn transition_hz(&self) -> f64 {
        match *self {
            BandParams::Lowpass { transition_hz, .. }
            | BandParams::Highpass { transition_hz, .. }
            | BandParams::Bandpass { transition_hz, .. } => transition_hz,
        }
    }

    /// Returns the short name of the response type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BandParams::Lowpass { .. } => "lowpass",
            BandParams::Highpass { .. } => "highpass",
            BandParams::Bandpass { .. } => "bandpass",
        }
    }
}

/// Parameters for the three filter branches of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreeBandParams {
    /// Low-pass branch.
    #[serde(default = "default_lowpass")]
    pub lowpass: BandParams,
    /// High-pass branch.
    #[serde(default = "default_highpass")]
    pub highpass: BandParams,
    /// Band-pass branch.
    #[serde(default = "default_bandpass")]
    pub bandpass: BandParams,
}

fn default_lowpass() -> BandParams {
    BandParams::Lowpass {
        cutoff_hz: 500.0,
        transition_hz: 100.0,
    }
}

fn default_highpass() -> BandParams {
    BandParams::Highpass {
        cutoff_hz: 500.0,
        transition_hz: 100.0,
    }
}

fn default_bandpass() -> BandParams {
    BandParams::Bandpass {
        low_hz: 500.0,
        high_hz: 1000.0,
        transition_hz: 100.0,
    }
}

impl Default for ThreeBandParams {
    fn default() -> Self {
        Self {
            lowpass: default_lowpass(),
            highpass: default_highpass(),
            bandpass: default_bandpass(),
        }
    }
}

impl ThreeBandParams {
    /// Iterates over `(json_key, params)` for each branch in output order.
    pub fn branches(&self) -> [(&'static str, &BandParams); 3] {
        [
            ("lowpass", &self.lowpass),
            ("highpass", &self.highpass),
            ("bandpass", &self.bandpass),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_band_params_serde_tagged() {
        let json = r#"{"type":"bandpass","low_hz":300.0,"high_hz":3000.0,"transition_hz":50.0}"#;
        let params: BandParams = serde_json::from_str(json).unwrap();
        assert_eq!(
            params,
            BandParams::Bandpass {
                low_hz: 300.0,
                high_hz: 3000.0,
                transition_hz: 50.0
            }
        );
        assert_eq!(params.kind_name(), "bandpass");
        assert_eq!(params.transition_hz(), 50.0);
    }

    #[test]
    fn test_band_params_rejects_unknown_fields() {
        let json = r#"{"type":"lowpass","cutoff_hz":300.0,"transition_hz":50.0,"q":1.0}"#;
        assert!(serde_json::from_str::<BandParams>(json).is_err());
    }

    #[test]
    fn test_three_band_defaults_fill_missing_branches() {
        let json = r#"{"lowpass":{"type":"lowpass","cutoff_hz":800.0,"transition_hz":200.0}}"#;
        let params: ThreeBandParams = serde_json::from_str(json).unwrap();
        assert_eq!(
            params.lowpass,
            BandParams::Lowpass {
                cutoff_hz: 800.0,
                transition_hz: 200.0
            }
        );
        assert_eq!(params.highpass, ThreeBandParams::default().highpass);
        assert_eq!(params.bandpass, ThreeBandParams::default().bandpass);
    }

    #[test]
    fn test_branches_order() {
        let params = ThreeBandParams::default();
        let names: Vec<_> = params.branches().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["lowpass", "highpass", "bandpass"]);
    }
}
