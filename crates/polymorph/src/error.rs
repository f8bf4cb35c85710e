//! Error types for Polymorph operations.
//!
//! This module provides the main error type [`PolymorphError`] which wraps
//! the error conditions of loading, rewriting and persisting an artifact.

use std::{io, path::PathBuf};

use thiserror::Error;

use polymorph_parser::error::ParseError;

/// The main error type for Polymorph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the diagnostics together with the source
/// text they point into, so callers can render them with source snippets.
#[derive(Debug, Error)]
pub enum PolymorphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("output directory `{}` does not exist", .0.display())]
    MissingOutputDir(PathBuf),

    #[error("cannot access artifact `{}`: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Edit error: {0}")]
    Edit(String),
}

impl PolymorphError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
