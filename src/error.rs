//! Error types for configuration and static assets.

use alloc::string::String;

/// Configuration value could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A `WIFIBOT_*` value failed to parse or is out of range.
    #[error("invalid value {value:?} for {key}")]
    Invalid {
        /// Variable name without the prefix (e.g. `PORT`)
        key: &'static str,
        /// Raw value as provided
        value: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, value: &str) -> Self {
        ConfigError::Invalid {
            key,
            value: value.into(),
        }
    }
}

/// Static asset file could not be read.
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Reading the file failed.
    #[error("failed to read asset {}", path.display())]
    Read {
        /// File that was being read
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
