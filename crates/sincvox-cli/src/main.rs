//! SincVox CLI - Command-line interface for three-band FIR filtering and
//! voice pitch shifting
//!
//! This binary reads a WAV file, writes its lowpass, highpass and bandpass
//! variants plus a pitch-shifted voice, and can design single kernels.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

mod cli_args;

use cli_args::{Cli, Commands, RunArgs};
use sincvox_cli::commands;
use sincvox_cli::commands::design::DesignRequest;
use sincvox_cli::commands::process::{Pipelines, ProcessRequest};

fn run_process(args: &RunArgs, pipelines: Pipelines) -> anyhow::Result<ExitCode> {
    let request = ProcessRequest {
        input: Path::new(&args.path),
        out_dir: Path::new(&args.out_dir),
        config_path: args.config.as_deref().map(Path::new),
        overrides: args.overrides()?,
        pipelines,
    };
    commands::process::run(&request, args.json)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        None => run_process(&cli.run, Pipelines::ALL),
        Some(Commands::Filter { run }) => run_process(run, Pipelines::FILTER_ONLY),
        Some(Commands::Voice { run }) => run_process(run, Pipelines::VOICE_ONLY),
        Some(Commands::Design {
            kind,
            sample_rate,
            cutoff,
            cutoff_high,
            transition,
            json,
        }) => commands::design::run(
            &DesignRequest {
                kind,
                sample_rate: *sample_rate,
                cutoff: *cutoff,
                cutoff_high: *cutoff_high,
                transition: *transition,
            },
            *json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
