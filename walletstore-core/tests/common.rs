#![allow(missing_docs)]
//! Common test utilities shared across integration tests.

use std::sync::{Arc, Mutex};

use walletstore_core::logger::{LogLevel, Logger};
use walletstore_core::platform::FileKeyValueStore;
use walletstore_core::{CredentialStore, StoreError};

/// Records every line the store logs.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("logger lock").clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: String) {
        self.lines
            .lock()
            .expect("logger lock")
            .push(format!("{level:?} {message}"));
    }

    fn exception(&self, error: &StoreError, function_name: &str) {
        self.lines
            .lock()
            .expect("logger lock")
            .push(format!("EXCEPTION {function_name}: {error}"));
    }
}

pub struct FileFixture {
    pub dir: tempfile::TempDir,
    pub logger: Arc<RecordingLogger>,
    pub store: CredentialStore,
}

pub async fn file_fixture() -> FileFixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let kv = FileKeyValueStore::new(dir.path()).await.expect("file store");
    let logger = Arc::new(RecordingLogger::default());
    let store = CredentialStore::with_logger(Arc::new(kv), logger.clone());
    FileFixture { dir, logger, store }
}
