//! Layered configuration
//!
//! Later layers win: built-in defaults, the user config
//! (`<config dir>/bomx/config.yaml`), then the project file `bomx.yaml` in
//! the working directory or the file named by `--config` / `BOMX_CONFIG`.
//! Command-line flags are applied on top by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use miette::Diagnostic;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Project config file name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "bomx.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(code(bomx::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    #[diagnostic(
        code(bomx::config::invalid),
        help("config keys are data, database, default_quantity and log_level")
    )]
    Invalid { path: PathBuf, message: String },

    #[error("Config file not found: {0}")]
    #[diagnostic(code(bomx::config::not_found))]
    NotFound(PathBuf),
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Master data file or directory
    pub data: Option<PathBuf>,

    /// SQLite master data store
    pub database: Option<PathBuf>,

    /// Root quantity when `--qty` is not given
    pub default_quantity: Decimal,

    /// Log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: None,
            database: None,
            default_quantity: Decimal::ONE,
            log_level: "warn".to_string(),
        }
    }
}

/// One config layer as written on disk; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    data: Option<PathBuf>,
    database: Option<PathBuf>,
    #[serde(default, deserialize_with = "crate::core::decimal::deserialize_option")]
    default_quantity: Option<Decimal>,
    log_level: Option<String>,
}

impl Config {
    /// Load defaults, user config and project config
    ///
    /// `explicit` replaces the working-directory lookup and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = user_config_path().filter(|p| p.exists()) {
            config.apply_file(&path)?;
        }

        match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => config.apply_file(path)?,
            None => {
                let path = Path::new(PROJECT_CONFIG_FILE);
                if path.exists() {
                    config.apply_file(path)?;
                }
            }
        }

        Ok(config)
    }

    /// Merge one YAML layer over the current values
    ///
    /// Relative paths are resolved against the directory holding the file.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layer: ConfigLayer = if content.trim().is_empty() {
            ConfigLayer::default()
        } else {
            serde_yml::from_str(&content).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if let Some(data) = layer.data {
            self.data = Some(base.join(data));
        }
        if let Some(database) = layer.database {
            self.database = Some(base.join(database));
        }
        if let Some(quantity) = layer.default_quantity {
            if quantity <= Decimal::ZERO {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message: format!("default_quantity must be greater than zero, got {quantity}"),
                });
            }
            self.default_quantity = quantity;
        }
        if let Some(level) = layer.log_level {
            self.log_level = level;
        }

        debug!(path = %path.display(), "applied config layer");
        Ok(())
    }
}

/// Per-user config file location
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bomx").map(|dirs| dirs.config_dir().join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_quantity, Decimal::ONE);
        assert_eq!(config.log_level, "warn");
        assert!(config.data.is_none());
    }

    #[test]
    fn test_layer_overrides_and_resolves_paths() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bomx.yaml");
        fs::write(
            &path,
            "data: master\ndatabase: db/master.db\ndefault_quantity: 10\nlog_level: debug\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.data, Some(tmp.path().join("master")));
        assert_eq!(config.database, Some(tmp.path().join("db/master.db")));
        assert_eq!(config.default_quantity, Decimal::from(10));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_layer_keeps_earlier_values() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bomx.yaml");
        fs::write(&path, "log_level: info\n").unwrap();

        let mut config = Config {
            default_quantity: Decimal::from(5),
            ..Config::default()
        };
        config.apply_file(&path).unwrap();
        assert_eq!(config.default_quantity, Decimal::from(5));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bomx.yaml");
        fs::write(&path, "max_depth: 3\n").unwrap();
        let err = Config::default().apply_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_non_positive_default_quantity_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bomx.yaml");
        fs::write(&path, "default_quantity: 0\n").unwrap();
        assert!(Config::default().apply_file(&path).is_err());
    }

    #[test]
    fn test_fractional_default_quantity_must_be_quoted() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bomx.yaml");

        fs::write(&path, "default_quantity: \"2.50000000000000000001\"\n").unwrap();
        let mut config = Config::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.default_quantity.to_string(), "2.50000000000000000001");

        fs::write(&path, "default_quantity: 2.5\n").unwrap();
        let err = Config::default().apply_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_explicit_missing_file() {
        let tmp = tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
