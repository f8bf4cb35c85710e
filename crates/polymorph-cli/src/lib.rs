//! Polymorph CLI library
//!
//! Loads the configuration and the schema, then rewrites the generated
//! declaration file under the output directory. Errors are reported with
//! miette through [`report`].

pub mod report;

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;

use std::{fs, path::Path};

use log::{info, warn};

use polymorph::{PolymorphError, Rewriter, RewriteSummary};

use report::SourceDiagnostic;

/// Run the Polymorph CLI application
///
/// Schema warnings are rendered against the schema and logged. With
/// `--dry-run` the rewrite is computed and summarized but not written.
///
/// # Errors
///
/// Returns [`CliError`] naming the input that failed: the configuration,
/// the schema, or the artifact under the output directory.
pub fn run(args: &Args) -> Result<RewriteSummary, CliError> {
    info!(
        schema_path = args.schema,
        output_dir = args.output;
        "Processing schema"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let schema_path = Path::new(&args.schema);
    let source = fs::read_to_string(schema_path).map_err(|source| CliError::ReadSchema {
        path: schema_path.to_path_buf(),
        source,
    })?;

    let rewriter = Rewriter::new(app_config);
    let (model, warnings) =
        rewriter
            .load_model_with_warnings(&source)
            .map_err(|source| CliError::Schema {
                path: schema_path.to_path_buf(),
                source,
            })?;
    for warning in &warnings {
        let report = SourceDiagnostic::new(warning, schema_path, &source);
        warn!("{}", report::render(&report));
    }

    let output_dir = Path::new(&args.output);
    let artifact = output_dir.join(rewriter.config().artifact().path());
    let rewrite_error = |source: PolymorphError| CliError::rewrite(artifact.clone(), source);

    if args.dry_run {
        let rewrite = rewriter.preview(&model, output_dir).map_err(rewrite_error)?;
        info!(summary:% = rewrite.summary; "Dry run, artifact left unchanged");
        return Ok(rewrite.summary);
    }

    let summary = rewriter.run(&model, output_dir).map_err(rewrite_error)?;
    info!(summary:%; "Declarations rewritten successfully");

    Ok(summary)
}
