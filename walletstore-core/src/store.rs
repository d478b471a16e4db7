//! Persistence of the current wallet credential.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::credential::WalletCredential;
use crate::error::{StoreError, StoreResult};
use crate::logger::{LogLevel, Logger, TracingLogger};
use crate::platform::KeyValueStore;

/// Name of the single slot holding the current wallet.
pub const CURRENT_WALLET_KEY: &str = "currentWallet";

/// Saves, loads and deletes the wallet credential kept on this device.
///
/// The store holds at most one credential, under [`CURRENT_WALLET_KEY`].
/// Address and private key are serialized together as one JSON record, so a
/// partially written credential is never observed.
///
/// `save`, `load` and `delete` never fail outright: every error is logged
/// through the injected [`Logger`] and collapsed into `false` / `None`. The
/// `try_*` variants return the error instead.
///
/// No lock is taken around the slot. Concurrent saves race inside the
/// underlying store and the last write wins.
///
/// # Security
///
/// The private key is stored **unencrypted**. Protection at rest is
/// whatever the underlying [`KeyValueStore`] provides.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    logger: Arc<dyn Logger>,
}

impl CredentialStore {
    /// Creates a store that logs through `tracing`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_logger(store, Arc::new(TracingLogger))
    }

    /// Creates a store that logs through `logger`.
    #[must_use]
    pub fn with_logger(store: Arc<dyn KeyValueStore>, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    /// Persists `credential`, replacing any stored one.
    ///
    /// Returns `false` if the credential has an empty address or if
    /// serialization or the underlying write fails.
    pub async fn save(&self, credential: &WalletCredential) -> bool {
        match self.try_save(credential).await {
            Ok(()) => true,
            Err(err) => {
                self.logger.exception(&err, "save");
                false
            }
        }
    }

    /// Returns the stored credential.
    ///
    /// `None` means either that nothing is stored or that the record could not
    /// be read; use [`Self::try_load`] to tell the two apart.
    pub async fn load(&self) -> Option<WalletCredential> {
        match self.try_load().await {
            Ok(credential) => credential,
            Err(err) => {
                self.logger.exception(&err, "load");
                None
            }
        }
    }

    /// Removes the stored credential. Deleting from an empty store succeeds.
    pub async fn delete(&self) -> bool {
        match self.try_delete().await {
            Ok(()) => true,
            Err(err) => {
                self.logger.exception(&err, "delete");
                false
            }
        }
    }

    /// Like [`Self::save`], returning the failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidCredential`] for an empty address,
    /// [`StoreError::Serialization`] if encoding fails, or the underlying
    /// store's error if the write fails.
    pub async fn try_save(&self, credential: &WalletCredential) -> StoreResult<()> {
        if credential.address().is_empty() {
            return Err(StoreError::InvalidCredential("address is empty"));
        }

        self.info(format!(
            "Saving wallet credential: address={}, private_key_len={}",
            credential.address(),
            credential.private_key_len()
        ));
        if credential.private_key().is_none() {
            self.logger.log(
                LogLevel::Warn,
                "Saving wallet credential without a private key".to_string(),
            );
        }

        let payload = Zeroizing::new(serde_json::to_string(credential)?);
        self.store.set(CURRENT_WALLET_KEY, &payload).await?;

        // Read-back only confirms the write landed; its outcome is logged.
        let found = self.read_back().await;
        self.info(format!("Read-back after save found data: {found}"));
        Ok(())
    }

    /// Like [`Self::load`], distinguishing a missing record (`Ok(None)`) from
    /// an unreadable one (`Err`).
    ///
    /// # Errors
    ///
    /// Returns the underlying store's error if the read fails, or
    /// [`StoreError::Serialization`] if the stored record is malformed.
    pub async fn try_load(&self) -> StoreResult<Option<WalletCredential>> {
        let Some(raw) = self.store.get(CURRENT_WALLET_KEY).await? else {
            self.info("No wallet credential found".to_string());
            return Ok(None);
        };
        let raw = Zeroizing::new(raw);
        self.info("Wallet credential found".to_string());

        let credential: WalletCredential = serde_json::from_str(&raw)?;
        self.info(format!(
            "Loaded wallet credential: address={}, private_key_len={}",
            credential.address(),
            credential.private_key_len()
        ));
        Ok(Some(credential))
    }

    /// Like [`Self::delete`], returning the failure.
    ///
    /// # Errors
    ///
    /// Returns the underlying store's error if the removal fails.
    pub async fn try_delete(&self) -> StoreResult<()> {
        self.info("Deleting wallet credential".to_string());
        self.store.remove(CURRENT_WALLET_KEY).await?;

        let found = self.read_back().await;
        self.info(format!("Read-back after delete, slot empty: {}", !found));
        Ok(())
    }

    /// Whether the slot currently holds anything. Read failures count as
    /// "nothing found" and are logged at debug level.
    async fn read_back(&self) -> bool {
        match self.store.get(CURRENT_WALLET_KEY).await {
            Ok(value) => value.is_some(),
            Err(err) => {
                self.logger
                    .log(LogLevel::Debug, format!("Read-back failed: {err}"));
                false
            }
        }
    }

    fn info(&self, message: String) {
        self.logger.log(LogLevel::Info, message);
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("slot", &CURRENT_WALLET_KEY)
            .finish_non_exhaustive()
    }
}
