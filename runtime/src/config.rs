//! Dispatcher settings.
//!
//! Settings are plain data, loadable from YAML so a CLI can ship defaults
//! next to its binary. Every field has a default, so a partial file works.
//!
//! # Example YAML
//!
//! ```yaml
//! error_exit_code: -1
//! show_error_details: true
//! log_filter: warn
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Exit code used when a run ends in an error, unless configured otherwise.
pub const DEFAULT_ERROR_EXIT_CODE: i32 = -1;

/// Settings for one [`Dispatcher`](crate::Dispatcher).
///
/// # Examples
///
/// ```
/// use verbtree_runtime::DispatcherConfig;
///
/// let config: DispatcherConfig = serde_yaml::from_str("error_exit_code: 2").unwrap();
/// assert_eq!(config.error_exit_code, 2);
/// assert!(config.show_error_details);
/// assert_eq!(config.log_filter, "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Exit code for resolution, binding and handler errors.
    pub error_exit_code: i32,
    /// Render unexpected handler errors with type and cause chain.
    pub show_error_details: bool,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            error_exit_code: DEFAULT_ERROR_EXIT_CODE,
            show_error_details: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl DispatcherConfig {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigLoadError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigLoadError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(crate::ConfigLoadError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Saves the settings as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verbtree.yml");

        let config = DispatcherConfig {
            error_exit_code: 3,
            show_error_details: false,
            log_filter: "debug".to_string(),
        };
        config.save(&path).unwrap();

        assert_eq!(DispatcherConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DispatcherConfig::load_or_default(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config, DispatcherConfig::default());
        assert_eq!(config.error_exit_code, -1);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "error_exit_code: [not, a, number]").unwrap();

        assert!(matches!(
            DispatcherConfig::load_or_default(&path),
            Err(crate::ConfigLoadError::YamlError(_))
        ));
    }
}
