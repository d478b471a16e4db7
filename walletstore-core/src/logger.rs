use crate::error::StoreError;

/// Trait representing a logger that receives the credential store's messages.
///
/// A logger is handed to [`crate::CredentialStore::with_logger`] at
/// construction, so different stores (and tests) can use different loggers
/// without any process-wide state. Messages never contain private key
/// material; at most its length.
///
/// # Examples
///
/// Implementing the `Logger` trait:
///
/// ```rust
/// use walletstore_core::logger::{Logger, LogLevel};
///
/// struct MyLogger;
///
/// impl Logger for MyLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{:?}] {}", level, message);
///     }
/// }
/// ```
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    ///
    /// # Arguments
    ///
    /// * `level` - The severity level of the log message.
    /// * `message` - The log message to be recorded.
    fn log(&self, level: LogLevel, message: String);

    /// Records a failed operation together with the error that caused it.
    ///
    /// The default implementation logs at [`LogLevel::Error`].
    fn exception(&self, error: &StoreError, function_name: &str) {
        self.log(
            LogLevel::Error,
            format!("{function_name} failed: {error}"),
        );
    }
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum LogLevel {
    /// Designates very low priority, often extremely detailed messages.
    Trace,
    /// Designates lower priority debugging information.
    Debug,
    /// Designates informational messages that highlight the progress of the application.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

/// Default logger, forwarding every message to `tracing` under the
/// `walletstore` target.
///
/// Install a subscriber (e.g. `tracing-subscriber`) to see the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: String) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "walletstore", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "walletstore", "{message}"),
            LogLevel::Info => tracing::info!(target: "walletstore", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "walletstore", "{message}"),
            LogLevel::Error => tracing::error!(target: "walletstore", "{message}"),
        }
    }

    fn exception(&self, error: &StoreError, function_name: &str) {
        tracing::error!(
            target: "walletstore",
            function_name,
            kind = ?error.kind(),
            %error,
            "operation failed"
        );
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::{LogLevel, Logger};
    use crate::error::StoreError;

    /// Keeps every message so tests can assert on what was (not) logged.
    #[derive(Default)]
    pub struct CapturingLogger {
        entries: Mutex<Vec<(LogLevel, String)>>,
        exceptions: Mutex<Vec<(String, String)>>,
    }

    impl CapturingLogger {
        pub fn entries(&self) -> Vec<(LogLevel, String)> {
            self.entries.lock().unwrap().clone()
        }

        /// `(function_name, error message)` pairs.
        pub fn exceptions(&self) -> Vec<(String, String)> {
            self.exceptions.lock().unwrap().clone()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .any(|(_, message)| message.contains(needle))
                || self
                    .exceptions
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|(_, error)| error.contains(needle))
        }
    }

    impl Logger for CapturingLogger {
        fn log(&self, level: LogLevel, message: String) {
            self.entries.lock().unwrap().push((level, message));
        }

        fn exception(&self, error: &StoreError, function_name: &str) {
            self.exceptions
                .lock()
                .unwrap()
                .push((function_name.to_string(), error.to_string()));
        }
    }
}
