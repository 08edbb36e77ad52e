use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for the loose object store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// zlib compression level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Write each object to a temporary file in its fan-out directory and
    /// rename it into place, so a crash never leaves a truncated object
    /// under a valid address.
    pub staged_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            staged_writes: true,
        }
    }
}

impl StoreConfig {
    /// Highest zlib compression level.
    pub const MAX_COMPRESSION_LEVEL: u32 = 9;

    /// Parse a TOML document, e.g.
    ///
    /// ```toml
    /// compression_level = 9
    /// staged_writes = false
    /// ```
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> StoreResult<()> {
        if self.compression_level > Self::MAX_COMPRESSION_LEVEL {
            return Err(StoreError::Config(format!(
                "compression_level must be 0..={}, got {}",
                Self::MAX_COMPRESSION_LEVEL,
                self.compression_level
            )));
        }
        Ok(())
    }
}
