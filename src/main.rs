use clap::Parser;
use speedup_report::{chart::ChartConfig, run, style::StylePolicy, Error};
use std::{path::PathBuf, process::ExitCode};

/// Turn benchmark timings into speedup/efficiency charts and a summary.
#[derive(Parser, Debug)]
#[command(name = "speedup-report", version, about)]
struct Cli {
    /// CSV with `label` and `time` columns (optionally `workers`, `throughput`).
    /// The built-in dataset is used when omitted.
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ChartConfig::default();
    let policy = StylePolicy::default();

    match run(cli.input.as_deref(), &config, &policy) {
        Ok(outcome) => {
            if let Some(notice) = &outcome.analysis.notice {
                eprintln!("Warning: {notice}");
            }
            println!();
            outcome.summary.print();
            ExitCode::SUCCESS
        }
        Err(e @ Error::InputNotFound(_)) => {
            println!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
