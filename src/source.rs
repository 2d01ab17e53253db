//! Construction sources for a [`Transport`](crate::Transport)

use std::path::PathBuf;

use crate::error::TransportError;

/// Where a transport payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Raw text used as-is.
    Text(String),
    /// Path to a file read whole as UTF-8 text.
    File(PathBuf),
    /// JSON transport record.
    Json(String),
}

impl Source {
    /// Build a source from a kind tag (`FILE`, `JSON` or `STRING`, any case)
    /// and its payload.
    pub fn from_kind(kind: &str, payload: impl Into<String>) -> Result<Self, TransportError> {
        let payload = payload.into();
        match kind.to_ascii_uppercase().as_str() {
            "FILE" => Ok(Source::File(PathBuf::from(payload))),
            "JSON" => Ok(Source::Json(payload)),
            "STRING" => Ok(Source::Text(payload)),
            other => Err(TransportError::InvalidConstructionInput(format!(
                "unsupported source kind {:?}",
                other
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Text(_) => "STRING",
            Source::File(_) => "FILE",
            Source::Json(_) => "JSON",
        }
    }
}
