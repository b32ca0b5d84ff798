//! Reading pipeline configuration from TOML.

use crate::config::schema::{PipelineConfig, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read pipeline config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline config TOML{}: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid pipeline config{}: {source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

/// ` (<path>)` when the document came from a file, nothing otherwise.
fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" ({})", path.display()))
        .unwrap_or_default()
}

impl ConfigError {
    /// Attach the file a document was read from; I/O errors already carry it.
    fn with_path(self, file: &Path) -> Self {
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(file.to_path_buf()),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(file.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

/// Parse and validate a TOML document. Missing tables take their defaults.
pub fn load_from_str(input: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let document = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_from_str(&document).map_err(|err| err.with_path(path))?;
    debug!(path = %path.display(), patchers = config.patchers.len(), "loaded pipeline config");
    Ok(config)
}

/// Load `path` when given, otherwise fall back to [`PipelineConfig::default`].
pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => Ok(PipelineConfig::default()),
    }
}
