//! Configuration for ascii-transport

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Largest payload, in bytes, accepted at construction.
    pub max_input_size: usize,
    /// Whether `Transport::force_encode` may run at all.
    pub allow_forced_encode: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            allow_forced_encode: true,
        }
    }
}

impl TransportConfig {
    /// Parse a config from JSON. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub(crate) fn check_size(&self, size: usize) -> Result<(), TransportError> {
        if size > self.max_input_size {
            return Err(TransportError::InputTooLarge {
                size,
                limit: self.max_input_size,
            });
        }
        Ok(())
    }
}
