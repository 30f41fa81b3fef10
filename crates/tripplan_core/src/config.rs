//! Core configuration: storage backend selection and logging.
//!
//! # Responsibility
//! - Parse TOML configuration into typed settings.
//! - Provide platform defaults so an empty file is a working config.
//!
//! # Invariants
//! - Storage paths are never empty; the local quota is never zero.
//! - Log levels are normalized with the same rules as `init_logging`.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::local_store::DEFAULT_LOCAL_QUOTA_BYTES;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "tripplan";
const LOCAL_STORE_FILE_NAME: &str = "itineraries.json";

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Single JSON file, single user, size ceiling enforced.
    Local {
        path: PathBuf,
        #[serde(default = "default_quota_bytes")]
        quota_bytes: u64,
    },
    /// SQLite document store scoped by owner key.
    Sqlite { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            path: default_data_dir().join(LOCAL_STORE_FILE_NAME),
            quota_bytes: DEFAULT_LOCAL_QUOTA_BYTES,
        }
    }
}

impl StorageConfig {
    pub fn path(&self) -> &Path {
        match self {
            Self::Local { path, .. } | Self::Sqlite { path } => path,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

/// Logging settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory; defaults to `<data dir>/logs`.
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: default_data_dir().join("logs"),
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.normalize()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        if self.storage.path().as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.path cannot be empty".to_string()));
        }
        if let StorageConfig::Local { quota_bytes: 0, .. } = self.storage {
            return Err(ConfigError::Invalid(
                "storage.quota_bytes must be greater than zero".to_string(),
            ));
        }
        self.logging.level = normalize_level(&self.logging.level)
            .map_err(ConfigError::Invalid)?
            .to_string();
        Ok(())
    }
}

/// Platform data directory for this application, falling back to the temp dir.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
}

fn default_quota_bytes() -> u64 {
    DEFAULT_LOCAL_QUOTA_BYTES
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StorageConfig};
    use crate::repo::local_store::DEFAULT_LOCAL_QUOTA_BYTES;
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_local_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        match config.storage {
            StorageConfig::Local { path, quota_bytes } => {
                assert!(path.ends_with("itineraries.json"));
                assert_eq!(quota_bytes, DEFAULT_LOCAL_QUOTA_BYTES);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn parses_sqlite_backend_and_normalizes_level() {
        let config = CoreConfig::from_toml_str(
            r#"
            [storage]
            backend = "sqlite"
            path = "/var/lib/tripplan/trips.sqlite3"

            [logging]
            level = "WARNING"
            dir = "/var/log/tripplan"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/var/lib/tripplan/trips.sqlite3")
            }
        );
        assert_eq!(config.storage.backend_name(), "sqlite");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn rejects_zero_quota_and_unknown_backend() {
        let err = CoreConfig::from_toml_str(
            "[storage]\nbackend = \"local\"\npath = \"/tmp/trips.json\"\nquota_bytes = 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_toml_str("[storage]\nbackend = \"firestore\"\npath = \"x\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
