//! Command-line argument definitions for the Polymorph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the schema, the generated output
//! directory, the configuration file and logging verbosity.

use clap::Parser;
use log::LevelFilter;

/// Command-line arguments for the Polymorph declaration rewriter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the schema (ZModel) file
    #[arg(help = "Path to the schema file")]
    pub schema: String,

    /// Base output directory of the generated client
    #[arg(short, long)]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Compute and log the rewrite without writing the artifact
    #[arg(long)]
    pub dry_run: bool,
}
