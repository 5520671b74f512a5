//! Configuration management for pg-refresh.
//!
//! Loads configuration from a TOML file; command-line flags override file values.

use crate::utils::{RefreshError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Backup service CLI used for listing and URL resolution
    #[serde(default = "default_cli")]
    pub cli: String,

    /// Remote application whose backups are listed
    #[serde(default)]
    pub app: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database restored into
    #[serde(default = "default_database_name")]
    pub name: String,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default = "default_restore_program")]
    pub restore_program: String,

    #[serde(default = "default_createdb_program")]
    pub createdb_program: String,

    #[serde(default = "default_dropdb_program")]
    pub dropdb_program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Where the dump is written before restore
    #[serde(default = "default_dump_path")]
    pub dump_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_cli() -> String {
    "heroku".to_string()
}

fn default_database_name() -> String {
    "development".to_string()
}

fn default_restore_program() -> String {
    "pg_restore".to_string()
}

fn default_createdb_program() -> String {
    "createdb".to_string()
}

fn default_dropdb_program() -> String {
    "dropdb".to_string()
}

fn default_dump_path() -> PathBuf {
    PathBuf::from("dump.sql")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            app: String::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: default_database_name(),
            host: None,
            port: None,
            user: None,
            restore_program: default_restore_program(),
            createdb_program: default_createdb_program(),
            dropdb_program: default_dropdb_program(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dump_path: default_dump_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: RemoteConfig::default(),
            database: DatabaseConfig::default(),
            download: DownloadConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| RefreshError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check that everything the pipeline needs is present
    pub fn validate(&self) -> Result<()> {
        self.validate_remote()?;
        self.target_database(None)?;
        Ok(())
    }

    /// Check the settings needed to talk to the backup service
    pub fn validate_remote(&self) -> Result<()> {
        if self.remote.app.trim().is_empty() {
            return Err(RefreshError::Config(
                "remote.app must name the application whose backups are listed".to_string(),
            ));
        }
        Ok(())
    }

    /// Database a command should act on: `requested` if given, else
    /// `database.name`. Either way the name must not be blank.
    pub fn target_database(&self, requested: Option<String>) -> Result<String> {
        let name = requested.unwrap_or_else(|| self.database.name.clone());
        if name.trim().is_empty() {
            return Err(RefreshError::Config("database name must not be empty".to_string()));
        }
        Ok(name)
    }

    /// Connection flags shared by pg_restore, createdb and dropdb
    pub fn connection_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(host) = &self.database.host {
            args.push("--host".to_string());
            args.push(host.clone());
        }
        if let Some(port) = self.database.port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        if let Some(user) = &self.database.user {
            args.push("--username".to_string());
            args.push(user.clone());
        }
        args
    }
}
