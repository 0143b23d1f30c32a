//! Error types for loading dispatcher settings.

use thiserror::Error;

/// Errors that can occur while reading or writing a settings file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`ConfigLoadError`].
pub type Result<T> = std::result::Result<T, ConfigLoadError>;
