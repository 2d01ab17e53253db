//! Error types for ascii-transport

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid construction input: {0}")]
    InvalidConstructionInput(String),

    #[error("cannot encode already encoded data; use force_encode if this is intended")]
    AlreadyEncoded,

    #[error("cannot decode already decoded data")]
    AlreadyDecoded,

    #[error("malformed token {token:?} at offset {offset}")]
    MalformedToken { token: String, offset: usize },

    #[error("forced encoding is disabled by configuration")]
    ForcedEncodeDisabled,

    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
