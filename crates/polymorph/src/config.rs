//! Configuration types for the Polymorph rewriter.
//!
//! All types implement [`serde::Deserialize`] so the CLI can load them from
//! a TOML file. Every section and key is optional.
//!
//! # Example
//!
//! ```
//! # use polymorph::config::AppConfig;
//! # use polymorph_core::delegate::EmptyDelegatePolicy;
//! let config = AppConfig::default();
//! assert_eq!(config.rewrite().empty_delegate(), EmptyDelegatePolicy::Skip);
//! assert_eq!(config.artifact().path().to_str(), Some(".prisma/index.d.ts"));
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use polymorph_core::delegate::EmptyDelegatePolicy;

/// Location of the generated declaration file, relative to the output
/// directory.
pub const DEFAULT_ARTIFACT_PATH: &str = ".prisma/index.d.ts";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rewrite pass section.
    #[serde(default)]
    rewrite: RewriteConfig,

    /// Artifact location section.
    #[serde(default)]
    artifact: ArtifactConfig,
}

impl AppConfig {
    pub fn new(rewrite: RewriteConfig, artifact: ArtifactConfig) -> Self {
        Self { rewrite, artifact }
    }

    /// Returns the rewrite configuration.
    pub fn rewrite(&self) -> &RewriteConfig {
        &self.rewrite
    }

    /// Returns the artifact configuration.
    pub fn artifact(&self) -> &ArtifactConfig {
        &self.artifact
    }
}

/// Settings of the rewrite pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewriteConfig {
    /// Handling of delegates that no entity extends.
    #[serde(default)]
    empty_delegate: EmptyDelegatePolicy,
}

impl RewriteConfig {
    pub fn new(empty_delegate: EmptyDelegatePolicy) -> Self {
        Self { empty_delegate }
    }

    pub fn empty_delegate(&self) -> EmptyDelegatePolicy {
        self.empty_delegate
    }
}

/// Where the generated declaration file lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Path of the artifact relative to the output directory.
    #[serde(default = "default_artifact_path")]
    path: PathBuf,
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: default_artifact_path(),
        }
    }
}

impl ArtifactConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the artifact path relative to the output directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
