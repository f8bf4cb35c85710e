//! Errors reported by the `polymorph` binary.
//!
//! Each variant records which input failed: the configuration, the schema
//! or the generated artifact. Library errors are kept as the source so the
//! report shows the full cause chain.

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use polymorph::PolymorphError;

use crate::config::ConfigError;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read schema `{}`", path.display())]
    #[diagnostic(code(polymorph::schema::read))]
    ReadSchema {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The schema failed to parse or validate.
    #[error("schema `{}` is invalid", path.display())]
    #[diagnostic(code(polymorph::schema::invalid))]
    Schema {
        path: PathBuf,
        #[source]
        source: PolymorphError,
    },

    /// The artifact could not be located, parsed, rewritten or written.
    #[error("cannot rewrite `{}`", artifact.display())]
    #[diagnostic(code(polymorph::rewrite))]
    Rewrite {
        artifact: PathBuf,
        #[source]
        source: PolymorphError,
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Wrap a rewrite failure of `artifact`, with a hint for the failures a
    /// user can fix from the command line.
    pub fn rewrite(artifact: PathBuf, source: PolymorphError) -> Self {
        let help = match &source {
            PolymorphError::MissingOutputDir(_) => {
                Some("pass the directory the client was generated into with `--output`".to_string())
            }
            PolymorphError::Artifact { .. } => Some(
                "generate the client first, or set `[artifact] path` in the configuration"
                    .to_string(),
            ),
            _ => None,
        };
        Self::Rewrite {
            artifact,
            source,
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_missing_output_dir_has_hint() {
        let err = CliError::rewrite(
            PathBuf::from("out/.prisma/index.d.ts"),
            PolymorphError::MissingOutputDir(PathBuf::from("out")),
        );

        assert_eq!(err.to_string(), "cannot rewrite `out/.prisma/index.d.ts`");
        assert_eq!(err.code().unwrap().to_string(), "polymorph::rewrite");
        assert!(err.help().unwrap().to_string().contains("--output"));
    }

    #[test]
    fn test_edit_conflict_has_no_hint() {
        let err = CliError::rewrite(
            PathBuf::from("index.d.ts"),
            PolymorphError::Edit("conflicting edits at 3..9".to_string()),
        );
        assert!(err.help().is_none());
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "Edit error: conflicting edits at 3..9"
        );
    }

    #[test]
    fn test_config_errors_keep_their_code() {
        let err = CliError::from(ConfigError::MissingFile(Path::new("p.toml").to_path_buf()));
        assert_eq!(err.code().unwrap().to_string(), "polymorph::config::missing");
    }
}
