//! Foreign-language surface of the credential store.
//!
//! The host app (Swift, Kotlin or React Native) supplies its persistent
//! key-value device store and, optionally, its logger. Both are wrapped into
//! the crate's own [`KeyValueStore`] and [`Logger`] traits so the host gets
//! exactly the same save / load / delete contract as Rust callers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::logger::{LogLevel, Logger, TracingLogger};
use crate::platform::KeyValueStore;
use crate::{CredentialStore, WalletCredential};

/// Errors a foreign key-value store reports back to Rust.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ForeignStoreError {
    /// The host store rejected the call.
    #[error("host store error: {0}")]
    Store(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for ForeignStoreError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

impl From<ForeignStoreError> for StoreError {
    fn from(error: ForeignStoreError) -> Self {
        Self::Backend(error.to_string())
    }
}

/// Persistent key-value device store implemented by the host app.
///
/// On React Native this is typically backed by `AsyncStorage` or a secure
/// storage module; on iOS by the Keychain or `UserDefaults`.
#[uniffi::export(with_foreign)]
#[async_trait]
pub trait ForeignKeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the host store fails.
    async fn get(&self, key: String) -> Result<Option<String>, ForeignStoreError>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the host store fails.
    async fn set(&self, key: String, value: String) -> Result<(), ForeignStoreError>;

    /// Removes `key`. Removing a missing key must succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the host store fails.
    async fn remove(&self, key: String) -> Result<(), ForeignStoreError>;
}

/// Logger implemented by the host app.
#[uniffi::export(with_foreign)]
pub trait ForeignLogger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);

    /// Records a failed operation with its error message.
    fn exception(&self, error: String, function_name: String);
}

struct ForeignStoreAdapter(Arc<dyn ForeignKeyValueStore>);

#[async_trait]
impl KeyValueStore for ForeignStoreAdapter {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.0.get(key.to_string()).await?)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        Ok(self.0.set(key.to_string(), value.to_string()).await?)
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        Ok(self.0.remove(key.to_string()).await?)
    }
}

struct ForeignLoggerAdapter(Arc<dyn ForeignLogger>);

impl Logger for ForeignLoggerAdapter {
    fn log(&self, level: LogLevel, message: String) {
        self.0.log(level, message);
    }

    fn exception(&self, error: &StoreError, function_name: &str) {
        self.0.exception(error.to_string(), function_name.to_string());
    }
}

/// A wallet credential as seen by the host app.
#[derive(uniffi::Record)]
pub struct WalletCredentialRecord {
    /// The public wallet address.
    pub address: String,
    /// The private key; `None` for a degraded record.
    pub private_key: Option<String>,
}

impl From<WalletCredentialRecord> for WalletCredential {
    fn from(record: WalletCredentialRecord) -> Self {
        match record.private_key {
            Some(key) => Self::new(record.address, key),
            None => Self::address_only(record.address),
        }
    }
}

impl From<WalletCredential> for WalletCredentialRecord {
    fn from(credential: WalletCredential) -> Self {
        Self {
            address: credential.address().to_string(),
            private_key: credential
                .private_key()
                .map(|key| key.expose_secret().to_string()),
        }
    }
}

/// The credential store exported to the host app.
#[derive(uniffi::Object)]
pub struct WalletCredentialStore {
    inner: CredentialStore,
}

#[uniffi::export(async_runtime = "tokio")]
impl WalletCredentialStore {
    /// Creates a store over the host's key-value store. Without a logger,
    /// messages go to `tracing`.
    #[must_use]
    #[uniffi::constructor]
    pub fn new(
        store: Arc<dyn ForeignKeyValueStore>,
        logger: Option<Arc<dyn ForeignLogger>>,
    ) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(ForeignStoreAdapter(store));
        let logger: Arc<dyn Logger> = match logger {
            Some(logger) => Arc::new(ForeignLoggerAdapter(logger)),
            None => Arc::new(TracingLogger),
        };
        Self {
            inner: CredentialStore::with_logger(store, logger),
        }
    }

    /// Persists the credential. Returns `false` on any failure.
    pub async fn save(&self, credential: WalletCredentialRecord) -> bool {
        self.inner.save(&credential.into()).await
    }

    /// Returns the stored credential, `None` if absent or unreadable.
    pub async fn load(&self) -> Option<WalletCredentialRecord> {
        self.inner.load().await.map(Into::into)
    }

    /// Removes the stored credential. Returns `false` on failure.
    pub async fn delete(&self) -> bool {
        self.inner.delete().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct HostStore {
        values: Mutex<HashMap<String, String>>,
        reject_writes: bool,
    }

    #[async_trait]
    impl ForeignKeyValueStore for HostStore {
        async fn get(&self, key: String) -> Result<Option<String>, ForeignStoreError> {
            Ok(self.values.lock().unwrap().get(&key).cloned())
        }

        async fn set(&self, key: String, value: String) -> Result<(), ForeignStoreError> {
            if self.reject_writes {
                return Err(ForeignStoreError::Store("quota exceeded".to_string()));
            }
            self.values.lock().unwrap().insert(key, value);
            Ok(())
        }

        async fn remove(&self, key: String) -> Result<(), ForeignStoreError> {
            self.values.lock().unwrap().remove(&key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct HostLogger {
        exceptions: Mutex<Vec<(String, String)>>,
    }

    impl ForeignLogger for HostLogger {
        fn log(&self, _level: LogLevel, _message: String) {}

        fn exception(&self, error: String, function_name: String) {
            self.exceptions.lock().unwrap().push((function_name, error));
        }
    }

    #[tokio::test]
    async fn test_host_round_trip() {
        let host = Arc::new(HostStore::default());
        let store = WalletCredentialStore::new(host.clone(), None);

        let saved = store
            .save(WalletCredentialRecord {
                address: "Addr1".to_string(),
                private_key: Some("Key1".to_string()),
            })
            .await;
        assert!(saved);
        assert_eq!(
            host.values.lock().unwrap().get("currentWallet").cloned(),
            Some(r#"{"address":"Addr1","privateKey":"Key1"}"#.to_string())
        );

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.address, "Addr1");
        assert_eq!(loaded.private_key.as_deref(), Some("Key1"));

        assert!(store.delete().await);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_host_failure_reaches_host_logger() {
        let host = Arc::new(HostStore {
            reject_writes: true,
            ..HostStore::default()
        });
        let logger = Arc::new(HostLogger::default());
        let store = WalletCredentialStore::new(host, Some(logger.clone()));

        let saved = store
            .save(WalletCredentialRecord {
                address: "Addr1".to_string(),
                private_key: None,
            })
            .await;
        assert!(!saved);

        let exceptions = logger.exceptions.lock().unwrap();
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].0, "save");
        assert!(exceptions[0].1.contains("quota exceeded"));
    }
}
