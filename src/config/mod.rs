//! Database Access Configuration
//!
//! Describes how to reach the results database, stored as a small TOML
//! document. A missing or unreadable file is never fatal for the caller:
//! [`create_config`] synthesizes a working default and persists it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Default backing store file name
pub const DEFAULT_DATABASE_FILE: &str = "quiniela.db";

/// Scheme prefix of a `connection.target` pointing at a SQLite file
pub const SQLITE_SCHEME: &str = "sqlite:";

/// Target selecting a private in-memory store
pub const SQLITE_MEMORY_TARGET: &str = "sqlite::memory:";

/// Text encoding written into new configurations
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Label written at the top of every generated file
const CONFIG_LABEL: &str = "# Configuración BD";

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("cannot read configuration file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration file {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration file {0:?} has no connection.target")]
    MissingTarget(PathBuf),
}

/// Database access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// `[connection]` table
    pub connection: ConnectionSettings,
}

/// Keys of the `[connection]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection descriptor, `sqlite:<path>`
    pub target: String,
    /// Login user (unused by SQLite)
    #[serde(default)]
    pub user: String,
    /// Login password (unused by SQLite)
    #[serde(default)]
    pub password: String,
    /// Text encoding of the store
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl DbConfig {
    /// Build a configuration pointing at a SQLite file.
    ///
    /// The target is text, so a path that is not valid UTF-8 is stored with
    /// its invalid bytes replaced and will name a different file.
    pub fn for_database(database: &Path) -> Self {
        let path = match database.to_str() {
            Some(path) => path.to_string(),
            None => {
                warn!("Database path {:?} is not valid UTF-8", database);
                database.to_string_lossy().into_owned()
            }
        };
        Self {
            connection: ConnectionSettings {
                target: format!("{}{}", SQLITE_SCHEME, path),
                user: String::new(),
                password: String::new(),
                encoding: default_encoding(),
            },
        }
    }

    /// Serialize to the on-disk text form, label included
    pub fn to_document(&self) -> Result<String, toml::ser::Error> {
        let body = toml::to_string_pretty(self)?;
        Ok(format!("{}\n{}", CONFIG_LABEL, body))
    }
}

/// Load a configuration file.
///
/// Fails if the file is absent, unreadable, not valid TOML, or lacks a
/// non-empty `connection.target`. Nothing is returned on partial success.
pub fn load_config(path: &Path) -> Result<DbConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let config: DbConfig = toml::from_str(&content).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    if config.connection.target.trim().is_empty() {
        return Err(ConfigError::MissingTarget(path.to_path_buf()));
    }

    Ok(config)
}

/// Synthesize a configuration for `database` and write it to `path`.
///
/// An empty `database` selects [`DEFAULT_DATABASE_FILE`]. The configuration is
/// returned even when it could not be written; the write failure is logged.
pub fn create_config(path: &Path, database: &Path) -> DbConfig {
    let database = if database.as_os_str().is_empty() {
        Path::new(DEFAULT_DATABASE_FILE)
    } else {
        database
    };
    let config = DbConfig::for_database(database);

    match save_config(&config, path) {
        Ok(()) => info!(
            "Created configuration file {:?} for database {:?}",
            path, database
        ),
        Err(e) => warn!("Could not save configuration to {:?}: {}", path, e),
    }

    config
}

/// Save configuration to file
pub fn save_config(config: &DbConfig, path: &Path) -> std::io::Result<()> {
    let content = config
        .to_document()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, content)
}
