//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/spedtree/spedtree.toml`
//! 3. Local config: `./.spedtree.toml`, or the file given with `--config`
//! 4. Environment variables: `SPEDTREE_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{LineFormat, DELIMITER, TYPE_TAG_WIDTH};
use crate::infrastructure::{Encoding, InfraError};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".spedtree.toml";

/// Shape of record lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormatConfig {
    /// Field delimiter (default: `|`)
    pub delimiter: char,
    /// Characters in the type tag before the first delimiter (default: 4)
    pub type_tag_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            delimiter: DELIMITER,
            type_tag_width: TYPE_TAG_WIDTH,
        }
    }
}

/// Raw format config for intermediate parsing (`None` → inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFormatConfig {
    pub delimiter: Option<char>,
    pub type_tag_width: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub relations: Option<PathBuf>,
    pub encoding: Option<Encoding>,
    #[serde(default)]
    pub format: RawFormatConfig,
}

/// Unified configuration for spedtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Relation table (JSON) used when `--relations` is not given
    pub relations: Option<PathBuf>,
    /// Encoding of record files (default: latin1)
    pub encoding: Encoding,
    /// Record line shape
    pub format: FormatConfig,
}

/// Get the XDG config directory for spedtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "spedtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("spedtree.toml"))
}

fn config_err(e: ConfigError) -> InfraError {
    InfraError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on lookup failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
///
/// A relative `relations` path is taken relative to the config file.
fn load_raw_settings(path: &Path) -> Result<RawSettings, InfraError> {
    let content = std::fs::read_to_string(path).map_err(|e| InfraError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| InfraError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;
    if let Some(relations) = raw.relations.take() {
        let expanded = PathBuf::from(expand_env_vars(&relations.to_string_lossy()));
        raw.relations = Some(match path.parent() {
            Some(dir) if expanded.is_relative() => dir.join(expanded),
            _ => expanded,
        });
    }
    Ok(raw)
}

impl Settings {
    /// Domain line format described by these settings.
    pub fn line_format(&self) -> LineFormat {
        LineFormat {
            delimiter: self.format.delimiter,
            type_tag_width: self.format.type_tag_width,
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            relations: overlay.relations.clone().or_else(|| self.relations.clone()),
            encoding: overlay.encoding.unwrap_or(self.encoding),
            format: FormatConfig {
                delimiter: overlay.format.delimiter.unwrap_or(self.format.delimiter),
                type_tag_width: overlay
                    .format
                    .type_tag_width
                    .unwrap_or(self.format.type_tag_width),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit config file; must exist when given. Without it,
    ///   `./.spedtree.toml` is used if present.
    pub fn load(local: Option<&Path>) -> Result<Self, InfraError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let path = Path::new(LOCAL_CONFIG_FILE);
                if path.exists() {
                    debug!("local config: {}", path.display());
                    current = current.merge_with(&load_raw_settings(path)?);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply SPEDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, InfraError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("SPEDTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("relations") {
            settings.relations = Some(PathBuf::from(expand_env_vars(&val)));
        }
        if let Ok(val) = config.get_string("encoding") {
            settings.encoding = val.parse()?;
        }
        if let Ok(val) = config.get_string("format.delimiter") {
            let mut chars = val.chars();
            settings.format.delimiter = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(InfraError::Config {
                        message: format!("delimiter must be a single character: {:?}", val),
                    })
                }
            };
        }
        if let Ok(val) = config.get_int("format.type_tag_width") {
            settings.format.type_tag_width = usize::try_from(val).map_err(|_| InfraError::Config {
                message: format!("invalid type tag width: {}", val),
            })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), InfraError> {
        if self.format.delimiter.is_whitespace() {
            return Err(InfraError::Config {
                message: "delimiter cannot be whitespace".to_string(),
            });
        }
        if self.format.type_tag_width == 0 {
            return Err(InfraError::Config {
                message: "type_tag_width must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the settings as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, InfraError> {
        toml::to_string_pretty(self).map_err(|e| InfraError::Config {
            message: e.to_string(),
        })
    }
}
