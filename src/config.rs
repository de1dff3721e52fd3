//! Configuration module
//!
//! Loaded from a TOML file, by default
//! `<config dir>/station-ledger/config.toml`:
//!
//! ```toml
//! [ledger]
//! network_fee_rate = 100   # parts-per-ten-thousand
//!
//! [logging]
//! level = "info"
//! format = "text"          # or "json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::FeeRate;
use crate::shared::errors::ConfigError;

const APP_DIR: &str = "station-ledger";
const CONFIG_FILE: &str = "config.toml";

/// Ledger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Settlement fee in parts-per-ten-thousand of the station price
    pub network_fee_rate: FeeRate,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `station_ledger=debug`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown logging format '{}'",
                    other
                )))
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging level is empty".to_string()));
        }
        Ok(())
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("station-ledger-test-{}-{}", std::process::id(), name))
            .join(CONFIG_FILE)
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ledger.network_fee_rate.basis_points(), 100);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml("[ledger]\nnetwork_fee_rate = 250\n").unwrap();
        assert_eq!(cfg.ledger.network_fee_rate.basis_points(), 250);
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn rejects_fee_rate_above_whole() {
        let err = AppConfig::from_toml("[ledger]\nnetwork_fee_rate = 10001\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = AppConfig::load(&temp_path("missing")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let mut cfg = AppConfig::default();
        cfg.ledger.network_fee_rate = FeeRate::new(42).unwrap();
        cfg.logging.format = "json".to_string();
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("station-ledger/config.toml"));
    }
}
