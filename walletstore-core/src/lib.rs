//! On-device storage for a single wallet credential.
//!
//! [`CredentialStore`] saves, loads and deletes one [`WalletCredential`]
//! (address plus private key) through any [`platform::KeyValueStore`]. Every
//! outcome is reported through an injected [`logger::Logger`]; the private key
//! itself is never logged, only its length.
//!
//! ```no_run
//! # async fn demo() {
//! use std::sync::Arc;
//! use walletstore_core::{platform::MemoryKeyValueStore, CredentialStore, WalletCredential};
//!
//! let store = CredentialStore::new(Arc::new(MemoryKeyValueStore::new()));
//! assert!(store.save(&WalletCredential::new("Addr1", "Key1")).await);
//! assert_eq!(store.load().await, Some(WalletCredential::new("Addr1", "Key1")));
//! assert!(store.delete().await);
//! # }
//! ```
//!
//! # Limitations
//!
//! The private key is persisted **in plaintext**. The crate relies entirely on
//! the underlying store for protection at rest.

mod credential;
pub use credential::*;

mod error;
pub use error::*;

mod store;
pub use store::*;

/// Logging interface used by the store.
pub mod logger;

pub mod platform;

#[cfg(feature = "ffi")]
mod ffi;
#[cfg(feature = "ffi")]
pub use ffi::*;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!("walletstore_core");
