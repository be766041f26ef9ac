use crate::config::schema::{PackConfig, ValidationError};
use crate::lang::{LanguagePackRegistry, PackError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
    Pack {
        path: Option<PathBuf>,
        source: PackError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Io { .. } => self,
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            ConfigError::Pack { path: None, source } => ConfigError::Pack {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read language packs from {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse language pack TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse language pack TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid language packs ({}): {}", path.display(), source),
                None => write!(f, "invalid language packs: {}", source),
            },
            ConfigError::Pack { path, source } => match path {
                Some(path) => write!(f, "cannot build language packs ({}): {}", path.display(), source),
                None => write!(f, "cannot build language packs: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
            ConfigError::Pack { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<PackConfig, ConfigError> {
    let config: PackConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PackConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Merge the packs of a parsed config over `base`.
pub fn merge_into(
    config: &PackConfig,
    base: &LanguagePackRegistry,
) -> Result<LanguagePackRegistry, ConfigError> {
    let packs = config
        .build_packs(base)
        .map_err(|source| ConfigError::Pack { path: None, source })?;
    Ok(base.with_packs(packs))
}

/// Load a pack file and merge it over the built-in registry.
pub fn registry_from_path(path: impl AsRef<Path>) -> Result<LanguagePackRegistry, ConfigError> {
    let path = path.as_ref();
    let config = load_from_path(path)?;
    let registry = merge_into(&config, LanguagePackRegistry::builtin())
        .map_err(|error| error.with_path(path))?;
    tracing::info!(
        path = %path.display(),
        packs = config.packs.len(),
        name = config.meta.name.as_deref().unwrap_or("-"),
        "loaded language packs"
    );
    Ok(registry)
}
