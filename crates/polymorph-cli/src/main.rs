//! Polymorph CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

use polymorph_cli::{Args, report};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(args.log_level)
        .init();
    debug!(args:?; "Parsed arguments");

    match polymorph_cli::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            for report in report::reports(&err) {
                error!("{}", report::render(report.as_diagnostic()));
            }
            ExitCode::FAILURE
        }
    }
}
