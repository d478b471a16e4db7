//! File system-based key-value store.
//!
//! Each key is a file inside one directory. Writes use the
//! write-to-temp-then-rename pattern so a reader always sees either the
//! complete old value or the complete new value:
//!
//! 1. Write data to a uniquely named temporary file in the same directory
//! 2. `fsync` the temporary file
//! 3. Atomically rename it over the target
//! 4. `fsync` the parent directory (unix)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// Longest key accepted, in bytes. Keeps file names portable.
const MAX_KEY_LEN: usize = 128;

/// File system-based implementation of [`KeyValueStore`].
///
/// Values are written in plaintext. On unix, files are created readable and
/// writable by the owner only.
///
/// I/O goes through `tokio::fs`, so every method must be awaited inside a
/// tokio runtime.
///
/// # Example
///
/// ```ignore
/// let store = FileKeyValueStore::new("/path/to/dir").await?;
/// store.set("currentWallet", "{...}").await?;
/// let value = store.get("currentWallet").await?;
/// store.remove("currentWallet").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new<P: AsRef<Path>>(directory: P) -> StoreResult<Self> {
        let directory = directory.as_ref().to_path_buf();

        fs::create_dir_all(&directory).await.map_err(|e| {
            StoreError::io(
                format!("creating store directory '{}'", directory.display()),
                e,
            )
        })?;

        Ok(Self { directory })
    }

    /// The directory holding the store's files.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn value_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.directory.join(key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.directory
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()))
    }

    #[cfg(unix)]
    async fn sync_directory(&self) -> StoreResult<()> {
        let dir = fs::File::open(&self.directory).await.map_err(|e| {
            StoreError::io(
                format!("opening directory '{}' for sync", self.directory.display()),
                e,
            )
        })?;
        dir.sync_all()
            .await
            .map_err(|e| StoreError::io("syncing store directory", e))
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_async)]
    async fn sync_directory(&self) -> StoreResult<()> {
        // Directories cannot be opened for sync here; rename is still atomic.
        Ok(())
    }

    async fn write_temp(&self, temp_path: &Path, value: &str) -> StoreResult<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(temp_path).await.map_err(|e| {
            StoreError::io(
                format!("creating temporary file '{}'", temp_path.display()),
                e,
            )
        })?;
        file.write_all(value.as_bytes()).await.map_err(|e| {
            StoreError::io(
                format!("writing temporary file '{}'", temp_path.display()),
                e,
            )
        })?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::io("syncing temporary file", e))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.value_path(key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(format!("reading '{}'", path.display()), e)),
        };

        // Undecodable contents are a bad value, not a failing store.
        std::str::from_utf8(&bytes)
            .map(|value| Some(value.to_owned()))
            .map_err(|source| StoreError::InvalidEncoding {
                key: key.to_string(),
                source,
            })
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let final_path = self.value_path(key)?;
        let temp_path = self.temp_path(key);

        if let Err(err) = self.write_temp(&temp_path, value).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err);
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::io(
                format!(
                    "renaming '{}' to '{}'",
                    temp_path.display(),
                    final_path.display()
                ),
                e,
            ));
        }

        if let Err(err) = self.sync_directory().await {
            warn_unsynced(&err, "set");
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.value_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                if let Err(err) = self.sync_directory().await {
                    warn_unsynced(&err, "remove");
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(format!("removing '{}'", path.display()), e)),
        }
    }
}

/// The rename or unlink already changed the slot; only its durability is in
/// doubt, so the operation still succeeds.
fn warn_unsynced(err: &StoreError, operation: &str) {
    tracing::warn!(
        target: "walletstore",
        operation,
        %err,
        "directory sync failed; change applied but may not be durable"
    );
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> StoreResult<()> {
    let reject = |reason| {
        Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.is_empty() {
        return reject("key is empty");
    }
    if key.len() > MAX_KEY_LEN {
        return reject("key is too long");
    }
    if key.starts_with('.') {
        return reject("key starts with '.'");
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        return reject("key contains characters outside [A-Za-z0-9._-]");
    }
    Ok(())
}
