//! Underlying key-value stores the credential store delegates I/O to.
//!
//! The credential store is platform-agnostic: everything it persists goes
//! through the [`KeyValueStore`] trait, a small async string map keyed by
//! opaque names.
//!
//! # Platform Implementations
//!
//! - **iOS / Android / React Native**: the app's persistent key-value device
//!   store, implemented in the host language (see the `ffi` feature).
//! - **Desktop / CLI**: [`FileKeyValueStore`], one file per key with atomic
//!   replace.
//! - **Tests**: [`MemoryKeyValueStore`].
//!
//! None of these encrypt values at rest. Whatever protection the wallet
//! credential has on disk comes from the platform store itself.

use async_trait::async_trait;

use crate::error::StoreResult;

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Persistent key-value storage for small string values.
///
/// Implementations are expected to serialize their own internal writes.
/// Callers add no locking on top, so concurrent `set` calls on one key are
/// last-writer-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if it does not
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails (e.g. I/O error, permission denied).
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    /// Only returns an error for actual storage failures.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
