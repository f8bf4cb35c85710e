//! Loading and persisting the generated declaration file.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::PolymorphError;

/// A loaded declaration artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
    source: String,
}

impl Artifact {
    /// Resolves `relative` against `output_dir` and reads the file.
    ///
    /// # Errors
    ///
    /// Returns [`PolymorphError::MissingOutputDir`] when `output_dir` is
    /// not an existing directory and [`PolymorphError::Artifact`] when the
    /// file cannot be read.
    pub fn load(output_dir: &Path, relative: &Path) -> Result<Self, PolymorphError> {
        let path = locate(output_dir, relative)?;
        let source = fs::read_to_string(&path).map_err(|source| PolymorphError::Artifact {
            path: path.clone(),
            source,
        })?;

        debug!(path:? = path, bytes = source.len(); "Artifact loaded");
        Ok(Self { path, source })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the artifact atomically with `contents`.
    ///
    /// The text is written to a temporary file in the artifact's directory,
    /// which is then renamed over the original.
    pub fn persist(&self, contents: &str) -> Result<(), PolymorphError> {
        let artifact_error = |source| PolymorphError::Artifact {
            path: self.path.clone(),
            source,
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir).map_err(artifact_error)?;
        file.write_all(contents.as_bytes()).map_err(artifact_error)?;
        file.as_file().sync_all().map_err(artifact_error)?;
        file.persist(&self.path)
            .map_err(|err| artifact_error(err.error))?;

        info!(path:? = self.path, bytes = contents.len(); "Artifact written");
        Ok(())
    }
}

/// Returns the artifact path for `output_dir`.
pub fn locate(output_dir: &Path, relative: &Path) -> Result<PathBuf, PolymorphError> {
    if output_dir.as_os_str().is_empty() || !output_dir.is_dir() {
        return Err(PolymorphError::MissingOutputDir(output_dir.to_path_buf()));
    }
    Ok(output_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Artifact::load(&missing, Path::new("index.d.ts")).unwrap_err();
        assert!(matches!(err, PolymorphError::MissingOutputDir(_)));

        let err = locate(Path::new(""), Path::new("index.d.ts")).unwrap_err();
        assert!(matches!(err, PolymorphError::MissingOutputDir(_)));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::load(dir.path(), Path::new(".prisma/index.d.ts")).unwrap_err();
        assert!(matches!(err, PolymorphError::Artifact { .. }));
    }

    #[test]
    fn test_persist_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".prisma")).unwrap();
        let path = dir.path().join(".prisma/index.d.ts");
        fs::write(&path, "type A = string\n").unwrap();

        let artifact = Artifact::load(dir.path(), Path::new(".prisma/index.d.ts")).unwrap();
        assert_eq!(artifact.source(), "type A = string\n");

        artifact.persist("type A = number\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "type A = number\n");

        let leftovers = fs::read_dir(dir.path().join(".prisma")).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
