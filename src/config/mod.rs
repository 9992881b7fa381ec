//! Configuration loading and management
//!
//! Values are resolved in three layers: built-in defaults, an optional YAML
//! file, then environment variables.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! storage:
//!   backend: json_file
//!   data_file: data/orders.json
//! startup:
//!   fail_closed: false
//! ```

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Env var naming the YAML file to load
pub const CONFIG_PATH_ENV: &str = "FOOD_ORDER_CONFIG";

/// File loaded when [`CONFIG_PATH_ENV`] is not set, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Which [`OrderRepository`](crate::core::OrderRepository) implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    JsonFile,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "in_memory",
            StorageBackend::JsonFile => "json_file",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(StorageBackend::InMemory),
            "json_file" | "json-file" | "json" => Ok(StorageBackend::JsonFile),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(anyhow!(
                "Unknown storage backend '{}' (expected in_memory, json_file or postgres)",
                other
            )),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Document path for the `json_file` backend
    pub data_file: PathBuf,

    /// Connection string for the `postgres` backend
    pub database_url: Option<String>,

    /// Pool size for the `postgres` backend
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            data_file: PathBuf::from("data/orders.json"),
            database_url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Exit instead of serving in degraded mode when storage cannot be opened
    pub fail_closed: bool,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub startup: StartupConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Defaults, then the YAML file, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `FOOD_ORDER_*` and `DATABASE_URL` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = lookup("FOOD_ORDER_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup("FOOD_ORDER_DATA_FILE") {
            self.storage.data_file = PathBuf::from(path);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }
        if let Some(host) = lookup("FOOD_ORDER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FOOD_ORDER_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid FOOD_ORDER_PORT '{}'", port))?;
        }
        if let Some(flag) = lookup("FOOD_ORDER_FAIL_CLOSED") {
            self.startup.fail_closed = parse_flag(&flag)
                .ok_or_else(|| anyhow!("Invalid FOOD_ORDER_FAIL_CLOSED '{}'", flag))?;
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
