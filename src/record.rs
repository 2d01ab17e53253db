//! Serialized transport record
//!
//! The wire shape is `{"data": <string>, "encoded": <bool>, "pseudo_encoded": <bool>}`.
//! Older producers omit `pseudo_encoded`, so it defaults to `false`.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRecord {
    pub data: String,
    pub encoded: bool,
    #[serde(default)]
    pub pseudo_encoded: bool,
}

impl TransportRecord {
    /// Parse a record from JSON.
    ///
    /// Well-formed JSON with missing or mistyped fields is reported as
    /// [`TransportError::InvalidConstructionInput`]; anything else that fails
    /// to parse surfaces as [`TransportError::SerializationError`].
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => TransportError::InvalidConstructionInput(e.to_string()),
            _ => TransportError::SerializationError(e),
        })
    }

    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }
}
