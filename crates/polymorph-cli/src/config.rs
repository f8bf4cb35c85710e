//! Configuration file discovery for the CLI.
//!
//! The first file found wins: an explicit `--config` path, then
//! `polymorph/config.toml` under the working directory, then the platform
//! configuration directory. Without any file the defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use polymorph::config::AppConfig;

const LOCAL_CONFIG: &str = "polymorph/config.toml";

/// Configuration errors. TOML errors point into the offending file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("configuration file `{}` not found", .0.display())]
    #[diagnostic(
        code(polymorph::config::missing),
        help("check the path passed to `--config`")
    )]
    MissingFile(PathBuf),

    #[error("cannot read configuration file `{}`", path.display())]
    #[diagnostic(code(polymorph::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(polymorph::config::invalid),
        help("`[rewrite] empty_delegate` takes \"skip\" or \"reject\", `[artifact] path` a relative path")
    )]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        message: String,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },
}

/// Find and load the configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] if an explicit path does not exist, or if the
/// selected file cannot be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:? = path; "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path:? = local_config; "Loading configuration from local path");
        return load_config_file(local_config);
    }

    match ProjectDirs::from("com", "polymorph", "polymorph") {
        Some(proj_dirs) => {
            let system_config = proj_dirs.config_dir().join("config.toml");
            if system_config.exists() {
                info!(path:? = system_config; "Loading configuration from system path");
                return load_config_file(&system_config);
            }
            debug!(path:? = system_config; "System configuration file not found");
        }
        None => debug!("Could not determine platform-specific config directory"),
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => Err(ConfigError::Parse {
            message: err.message().to_string(),
            span: err.span().map(SourceSpan::from),
            src: NamedSource::new(path.display().to_string(), content),
        }),
    }
}
