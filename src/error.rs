//! Error types for rustible-molecule.
//!
//! Every fallible operation in the crate returns [`Result`]. Only two kinds of
//! failure are expected in normal use: a scenario that declares no instances
//! and I/O errors while writing the generated artifacts. Both are surfaced to
//! the caller unchanged; the CLI decides the process exit status.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for rustible-molecule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostic printed when a scenario declares no instances.
pub const MISSING_INSTANCES_MESSAGE: &str =
    "Instances missing from the platform section of the scenario configuration.";

/// The main error type for rustible-molecule.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Inventory Errors
    // ========================================================================
    /// The derived inventory contains no hosts at all.
    #[error("Instances missing from the platform section of the scenario configuration.")]
    MissingInstances,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// Reading or writing a file or directory failed.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Source error
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML error.
    #[error("YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new invalid config error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingInstances => 1,
            Error::InvalidConfig { .. } | Error::YamlParse(_) | Error::JsonParse(_) => 2,
            Error::Io { .. } => 74,
        }
    }
}

/// Extension trait attaching the offending path to `std::io::Error`s.
pub trait IoResultExt<T> {
    /// Converts an IO error into [`Error::Io`] carrying `path`.
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}
