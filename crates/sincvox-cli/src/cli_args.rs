//! CLI argument definitions for the SincVox command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use sincvox_cli::settings::{parse_analysis_mode, ConfigOverrides, NormalizeChoice};

/// SincVox - Windowed-sinc filtering and voice pitch shifting
///
/// Without a subcommand, runs the three-band filter and the voice transform
/// over one WAV file.
#[derive(Parser)]
#[command(name = "sincvox")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write the lowpass, highpass and bandpass variants only
    Filter {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Write the pitch-shifted voice only
    Voice {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Design one kernel and print its summary
    Design {
        /// Response type
        #[arg(short, long, value_parser = ["lowpass", "highpass", "bandpass"])]
        kind: String,

        /// Sample rate in Hz
        #[arg(short, long)]
        sample_rate: u32,

        /// Cutoff in Hz (lower cutoff for bandpass)
        #[arg(short, long)]
        cutoff: f64,

        /// Upper cutoff in Hz (bandpass only)
        #[arg(long)]
        cutoff_high: Option<f64>,

        /// Transition bandwidth in Hz
        #[arg(short, long)]
        transition: f64,

        /// Output every coefficient as machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by the processing commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    /// Path to the input WAV file
    #[arg(short, long, default_value = "yukkuri.wav")]
    pub path: String,

    /// Directory for the output files
    #[arg(short, long, default_value = ".")]
    pub out_dir: String,

    /// JSON run configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pitch factor applied to the F0 track
    #[arg(long)]
    pub pitch: Option<f64>,

    /// Amplitude normalization around analysis/synthesis
    #[arg(long, value_parser = ["min-max", "fixed"])]
    pub normalize: Option<String>,

    /// Divisor for fixed normalization
    #[arg(long)]
    pub divisor: Option<f64>,

    /// F0 estimation mode
    #[arg(long, value_parser = ["dio", "harvest"])]
    pub analysis: Option<String>,

    /// Run the three filter branches on separate threads
    #[arg(long)]
    pub parallel: bool,

    /// Offer the action prompt after processing
    #[arg(short, long)]
    pub interactive: bool,

    /// Output machine-readable JSON diagnostics (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Converts the flags into configuration overrides.
    pub fn overrides(&self) -> Result<ConfigOverrides> {
        let normalize = self.normalize.as_deref().and_then(NormalizeChoice::parse);
        if normalize == Some(NormalizeChoice::MinMax) && self.divisor.is_some() {
            bail!("--divisor only applies to --normalize fixed");
        }
        Ok(ConfigOverrides {
            pitch_factor: self.pitch,
            normalize,
            divisor: self.divisor,
            analysis_mode: self.analysis.as_deref().and_then(parse_analysis_mode),
            parallel: self.parallel,
            interactive: self.interactive,
        })
    }
}
