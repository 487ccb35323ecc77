//! # Configuration
//!
//! Runtime settings read from environment variables. Every setting has a
//! default, so an empty environment yields a working configuration.
//!
//! | Variable                      | Default                       |
//! |-------------------------------|-------------------------------|
//! | `INVENTORY_BIND_ADDR`         | `127.0.0.1:3000`              |
//! | `INVENTORY_ALLOWED_ORIGIN`    | `http://localhost:8080`       |
//! | `INVENTORY_SEED_SAMPLE_DATA`  | `true`                        |
//! | `INVENTORY_STORAGE_BACKEND`   | `auto` (`auto`, `sqlite`, `kv`) |
//! | `INVENTORY_DATA_DIR`          | `<platform data dir>/Estoque` |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::storage::sqlite::DATABASE_FILE;

pub const ENV_BIND_ADDR: &str = "INVENTORY_BIND_ADDR";
pub const ENV_ALLOWED_ORIGIN: &str = "INVENTORY_ALLOWED_ORIGIN";
pub const ENV_SEED_SAMPLE_DATA: &str = "INVENTORY_SEED_SAMPLE_DATA";
pub const ENV_STORAGE_BACKEND: &str = "INVENTORY_STORAGE_BACKEND";
pub const ENV_DATA_DIR: &str = "INVENTORY_DATA_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const DATA_DIR_NAME: &str = "Estoque";

/// Which storage backend the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Relational when the runtime supports it, key-value otherwise
    #[default]
    Auto,
    Sqlite,
    KeyValue,
}

impl FromStr for BackendPreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "sqlite" | "relational" => Ok(Self::Sqlite),
            "kv" | "key-value" | "keyvalue" => Ok(Self::KeyValue),
            other => Err(anyhow::anyhow!(
                "Unknown storage backend '{}' (expected auto, sqlite or kv)",
                other
            )),
        }
    }
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::KeyValue => write!(f, "kv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub backend: BackendPreference,
    /// Directory holding the SQLite file or the key-value files
    pub data_directory: PathBuf,
}

impl StorageConfig {
    pub fn new<P: Into<PathBuf>>(backend: BackendPreference, data_directory: P) -> Self {
        Self {
            backend,
            data_directory: data_directory.into(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_directory.join(DATABASE_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    /// Origin allowed by CORS (the presentation layer)
    pub allowed_origin: String,
    /// Populate an empty store with sample products on startup
    pub seed_sample_data: bool,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid {}", ENV_BIND_ADDR))?;

        let allowed_origin =
            lookup(ENV_ALLOWED_ORIGIN).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let seed_sample_data = match lookup(ENV_SEED_SAMPLE_DATA) {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("Invalid {}", ENV_SEED_SAMPLE_DATA))?,
            None => true,
        };

        let backend = match lookup(ENV_STORAGE_BACKEND) {
            Some(value) => value.parse()?,
            None => BackendPreference::Auto,
        };

        let data_directory = match lookup(ENV_DATA_DIR) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => default_data_directory()?,
        };

        Ok(Self {
            bind_address,
            allowed_origin,
            seed_sample_data,
            storage: StorageConfig::new(backend, data_directory),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other)),
    }
}

/// Platform data directory, falling back to the home directory
fn default_data_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory; set {}", ENV_DATA_DIR))?;
    Ok(base.join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_BIND_ADDR, "0.0.0.0:4000"),
            (ENV_ALLOWED_ORIGIN, "http://localhost:19006"),
            (ENV_SEED_SAMPLE_DATA, "no"),
            (ENV_STORAGE_BACKEND, "KV"),
            (ENV_DATA_DIR, "/tmp/estoque"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:4000".parse().unwrap());
        assert_eq!(config.allowed_origin, "http://localhost:19006");
        assert!(!config.seed_sample_data);
        assert_eq!(config.storage.backend, BackendPreference::KeyValue);
        assert_eq!(config.storage.data_directory, PathBuf::from("/tmp/estoque"));
        assert_eq!(config.storage.database_path(), PathBuf::from("/tmp/estoque/estoque.db"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DATA_DIR, "/var/lib/estoque")])).unwrap();

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert!(config.seed_sample_data);
        assert_eq!(config.storage.backend, BackendPreference::Auto);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_BIND_ADDR, "not-an-address")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_SEED_SAMPLE_DATA, "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_STORAGE_BACKEND, "postgres")])).is_err());
    }

    #[test]
    fn test_backend_preference_round_trips_through_display() {
        for preference in [BackendPreference::Auto, BackendPreference::Sqlite, BackendPreference::KeyValue] {
            assert_eq!(preference.to_string().parse::<BackendPreference>().unwrap(), preference);
        }
    }
}
