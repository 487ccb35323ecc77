use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};

/// KvConnection exposes a flat, persistent string key/value surface.
///
/// Every key is a file inside the base directory, so a value survives
/// process restarts. Writes replace the whole value atomically.
#[derive(Clone, Debug)]
pub struct KvConnection {
    base_directory: PathBuf,
}

impl KvConnection {
    /// Open a key/value store rooted at `base_directory`, creating it if needed
    pub async fn open<P: AsRef<Path>>(base_directory: P) -> StorageResult<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.is_dir() {
            tokio::fs::create_dir_all(&base_path).await.map_err(|e| {
                StorageError::StorageUnavailable(format!("cannot create {}: {}", base_path.display(), e))
            })?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Map a key to a safe file name: "estoque products" -> "estoque_products"
    fn key_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_directory.join(file_name)
    }

    /// Read the value stored under `key`, if any
    pub async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.key_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key);

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Wrote {} bytes to key {}", value.len(), key);
        Ok(())
    }
}
