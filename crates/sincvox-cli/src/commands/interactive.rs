//! Interactive action prompt.
//!
//! After a run the user can pick actions by name to inspect the file each one
//! wrote: its duration, peak level and the F0 contour found by re-analyzing
//! it. The prompt only reads files back; it never modifies them.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use sincvox_dsp::vocoder::F0Summary;
use sincvox_dsp::wav::read_wav;
use sincvox_dsp::{Analyzer, Signal, SpectralVocoder};
use sincvox_spec::RunConfig;

use super::actions::{self, Action, ACTIONS};
use super::reporting::f0_line;

/// What the prompt shows for one output file.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSummary {
    /// Length in seconds.
    pub duration_seconds: f64,
    /// Peak absolute sample in the 16-bit scale.
    pub peak: f64,
    /// F0 statistics, or why analysis failed.
    pub f0: Result<F0Summary, String>,
}

impl ActionSummary {
    /// Peak level relative to 16-bit full scale.
    pub fn peak_dbfs(&self) -> f64 {
        20.0 * (self.peak / 32768.0).log10()
    }
}

/// Measures a decoded output file, analyzing its mono downmix with the
/// run's vocoder settings.
pub fn summarize(signal: &Signal, config: &RunConfig) -> ActionSummary {
    let vocoder = SpectralVocoder::from_voice_params(&config.voice, config.analysis_mode);
    let f0 = vocoder
        .analyze(&signal.downmix(), signal.sample_rate())
        .map(|features| F0Summary::from_track(&features.f0))
        .map_err(|e| e.to_string());

    ActionSummary {
        duration_seconds: signal.duration_seconds(),
        peak: signal.peak(),
        f0,
    }
}

/// Reads action names from `input` until `q`, `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    out_dir: &Path,
    config: &RunConfig,
) -> Result<()> {
    print_menu(out)?;

    let mut line = String::new();
    loop {
        write!(out, "{} ", ">".cyan().bold())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let name = line.trim();
        match name {
            "" => continue,
            "q" | "quit" => break,
            "list" | "?" => {
                print_menu(out)?;
                continue;
            }
            _ => {}
        }

        match actions::find(name) {
            Some(action) => describe(out, action, out_dir, config)?,
            None => writeln!(
                out,
                "  {} unknown action '{}' (type 'list' to see actions)",
                "!".yellow(),
                name
            )?,
        }
    }

    Ok(())
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", "Actions:".cyan().bold())?;
    for action in &ACTIONS {
        writeln!(
            out,
            "  {:<9} {} {}",
            action.name,
            action.file_name,
            format!("({})", action.description).dimmed()
        )?;
    }
    writeln!(out, "  {:<9} {}", "q", "quit".dimmed())?;
    Ok(())
}

fn describe<W: Write>(
    out: &mut W,
    action: &Action,
    out_dir: &Path,
    config: &RunConfig,
) -> Result<()> {
    let path = action.output_path(out_dir);
    let signal = match read_wav(&path) {
        Ok(signal) => signal,
        Err(e) => {
            writeln!(
                out,
                "  {} could not read {}: {}",
                "x".red(),
                path.display(),
                e
            )?;
            return Ok(());
        }
    };

    let summary = summarize(&signal, config);
    writeln!(out, "{} {}", action.name.green().bold(), path.display())?;
    writeln!(
        out,
        "  {} {:.3} s",
        "Duration:".dimmed(),
        summary.duration_seconds
    )?;
    writeln!(
        out,
        "  {} {:.0} ({:.1} dBFS)",
        "Peak:".dimmed(),
        summary.peak,
        summary.peak_dbfs()
    )?;
    match &summary.f0 {
        Ok(f0) => writeln!(out, "  {} {}", "F0:".dimmed(), f0_line(&(*f0).into()))?,
        Err(e) => writeln!(out, "  {} analysis failed: {}", "F0:".dimmed(), e)?,
    }
    Ok(())
}
