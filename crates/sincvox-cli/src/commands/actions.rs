//! Named actions and the files they produce.
//!
//! The table is the single place that ties an action name to a pipeline and
//! an output file name. Processing writes through it and the interactive
//! prompt reads back through it.

use std::path::{Path, PathBuf};

/// Pipeline that produces an action's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Lowpass branch of the three-band filter.
    Lowpass,
    /// Highpass branch of the three-band filter.
    Highpass,
    /// Bandpass branch of the three-band filter.
    Bandpass,
    /// Pitch-shifting voice transform.
    Voice,
}

impl Pipeline {
    /// Branch key used by the filter pipeline, or `None` for the voice transform.
    pub fn branch_key(&self) -> Option<&'static str> {
        match self {
            Pipeline::Lowpass => Some("lowpass"),
            Pipeline::Highpass => Some("highpass"),
            Pipeline::Bandpass => Some("bandpass"),
            Pipeline::Voice => None,
        }
    }
}

/// One named action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    /// Name typed at the prompt and used in reports.
    pub name: &'static str,
    /// Short description shown in the action list.
    pub description: &'static str,
    /// Producing pipeline.
    pub pipeline: Pipeline,
    /// Output file name inside the output directory.
    pub file_name: &'static str,
}

impl Action {
    /// Location of this action's output under `out_dir`.
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.file_name)
    }
}

/// Every action, in menu order.
pub const ACTIONS: [Action; 4] = [
    Action {
        name: "lowpass",
        description: "lowpass-filtered input",
        pipeline: Pipeline::Lowpass,
        file_name: "lowpass.wav",
    },
    Action {
        name: "highpass",
        description: "highpass-filtered input",
        pipeline: Pipeline::Highpass,
        file_name: "highpass.wav",
    },
    Action {
        name: "bandpass",
        description: "bandpass-filtered input",
        pipeline: Pipeline::Bandpass,
        file_name: "bandpass.wav",
    },
    Action {
        name: "voice",
        description: "pitch-shifted voice",
        pipeline: Pipeline::Voice,
        file_name: "VC1_test.wav",
    },
];

/// Looks up an action by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static Action> {
    ACTIONS.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

/// Looks up the action fed by a filter branch.
pub fn for_branch(key: &str) -> Option<&'static Action> {
    ACTIONS
        .iter()
        .find(|a| a.pipeline.branch_key() == Some(key))
}

/// The voice transform's action.
pub fn voice() -> &'static Action {
    &ACTIONS[3]
}
