//! ascii-transport: Run-length encoded transport format for ASCII text.
//!
//! Provides:
//! - A pure run-length transducer (`rle`) producing `<count><char>` tokens
//! - A stateful [`Transport`] wrapper that tracks whether its payload is encoded
//! - A fallback policy that never ships an encoding larger than the original
//! - JSON transport records for moving a wrapper between processes
//!
//! Typical flow: build a [`Transport`] from text, `encode` it, ship
//! `to_json()`, rebuild it with [`Transport::from_json`] on the other side and
//! `decode` to recover the text.

pub mod config;
pub mod error;
pub mod record;
pub mod rle;
pub mod source;

use std::path::Path;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::record::TransportRecord;
use crate::source::Source;

/// Encoding state of a transport payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportState {
    /// Payload holds the original text.
    #[default]
    Raw,
    /// Payload holds the token string.
    EncodedReal,
    /// Logically encoded, but the payload was left as the original text
    /// because the token string would not have been shorter.
    EncodedPseudo,
}

impl TransportState {
    /// Map the two serialized flags onto a state.
    ///
    /// `pseudo_encoded` without `encoded` cannot occur in a well-formed record
    /// and is read as `Raw`.
    pub fn from_flags(encoded: bool, pseudo_encoded: bool) -> Self {
        match (encoded, pseudo_encoded) {
            (false, pseudo) => {
                if pseudo {
                    tracing::warn!(
                        "transport record is pseudo-encoded but not encoded; treating as raw"
                    );
                }
                TransportState::Raw
            }
            (true, false) => TransportState::EncodedReal,
            (true, true) => TransportState::EncodedPseudo,
        }
    }

    pub fn is_encoded(self) -> bool {
        self != TransportState::Raw
    }

    pub fn is_pseudo_encoded(self) -> bool {
        self == TransportState::EncodedPseudo
    }
}

/// A text payload together with its encoding state
#[derive(Debug, Clone)]
pub struct Transport {
    data: String,
    state: TransportState,
    config: TransportConfig,
}

impl Transport {
    /// Wrap raw, unencoded text.
    pub fn new(text: impl Into<String>) -> Result<Self, TransportError> {
        Self::from_text(text, false)
    }

    /// Wrap text, marking it as already encoded when `encoded` is set.
    pub fn from_text(text: impl Into<String>, encoded: bool) -> Result<Self, TransportError> {
        Self::from_text_with_config(text, encoded, TransportConfig::default())
    }

    /// Like [`Transport::from_text`], with an explicit config.
    pub fn from_text_with_config(
        text: impl Into<String>,
        encoded: bool,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let state = TransportState::from_flags(encoded, false);
        Self::build(text.into(), state, config)
    }

    /// Read a whole file as the payload.
    pub fn from_file(path: impl AsRef<Path>, encoded: bool) -> Result<Self, TransportError> {
        Self::from_file_with_config(path, encoded, TransportConfig::default())
    }

    /// Like [`Transport::from_file`], with an explicit config.
    pub fn from_file_with_config(
        path: impl AsRef<Path>,
        encoded: bool,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let path = path.as_ref();
        if let Ok(meta) = std::fs::metadata(path) {
            config.check_size(usize::try_from(meta.len()).unwrap_or(usize::MAX))?;
        }
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded transport payload");
        Self::from_text_with_config(text, encoded, config)
    }

    /// Restore a transport from its JSON record.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        Self::from_json_with_config(json, TransportConfig::default())
    }

    /// Like [`Transport::from_json`], with an explicit config.
    pub fn from_json_with_config(
        json: &str,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let record = TransportRecord::from_json(json)?;
        Self::from_record_with_config(record, config)
    }

    /// Restore a transport from an in-memory record.
    pub fn from_record(record: TransportRecord) -> Result<Self, TransportError> {
        Self::from_record_with_config(record, TransportConfig::default())
    }

    /// Like [`Transport::from_record`], with an explicit config.
    pub fn from_record_with_config(
        record: TransportRecord,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let state = TransportState::from_flags(record.encoded, record.pseudo_encoded);
        Self::build(record.data, state, config)
    }

    /// Construct from any [`Source`].
    ///
    /// `encoded` applies to text and file sources; a JSON record carries its
    /// own flags.
    pub fn from_source(source: Source, encoded: bool) -> Result<Self, TransportError> {
        Self::from_source_with_config(source, encoded, TransportConfig::default())
    }

    /// Like [`Transport::from_source`], with an explicit config.
    pub fn from_source_with_config(
        source: Source,
        encoded: bool,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        match source {
            Source::Text(text) => Self::from_text_with_config(text, encoded, config),
            Source::File(path) => Self::from_file_with_config(path, encoded, config),
            Source::Json(json) => Self::from_json_with_config(&json, config),
        }
    }

    fn build(
        data: String,
        state: TransportState,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        config.check_size(data.len())?;
        Ok(Self {
            data,
            state,
            config,
        })
    }

    /// Encode the payload.
    ///
    /// Fails with [`TransportError::AlreadyEncoded`] if the payload is already
    /// encoded. If the token string is not strictly shorter than the text, the
    /// text is kept and the transport becomes pseudo-encoded.
    ///
    /// Lengths are compared in UTF-8 bytes, not characters, so non-ASCII
    /// text such as `"éé"` (4 bytes) encodes to `"2é"` (3 bytes).
    pub fn encode(&mut self) -> Result<(), TransportError> {
        if self.state.is_encoded() {
            return Err(TransportError::AlreadyEncoded);
        }
        self.apply_encoding();
        Ok(())
    }

    /// Encode the payload regardless of its current state.
    ///
    /// On an already encoded payload this encodes the token string again; a
    /// single `decode` will not recover the original text. Callers take
    /// responsibility for that.
    pub fn force_encode(&mut self) -> Result<(), TransportError> {
        if !self.config.allow_forced_encode {
            return Err(TransportError::ForcedEncodeDisabled);
        }
        if self.state.is_encoded() {
            tracing::warn!(state = ?self.state, "forcing encode of an already encoded payload");
        }
        self.apply_encoding();
        Ok(())
    }

    fn apply_encoding(&mut self) {
        let original_len = self.data.len();
        let encoded_len = rle::encoded_len(&self.data);
        if encoded_len < original_len {
            self.data = rle::encode(&self.data);
            self.state = TransportState::EncodedReal;
        } else {
            self.state = TransportState::EncodedPseudo;
        }
        tracing::debug!(original_len, encoded_len, state = ?self.state, "encoded transport payload");
    }

    /// Decode the payload.
    ///
    /// Fails with [`TransportError::AlreadyDecoded`] on a raw payload. A
    /// pseudo-encoded payload is left as is. On error nothing changes.
    pub fn decode(&mut self) -> Result<(), TransportError> {
        match self.state {
            TransportState::Raw => return Err(TransportError::AlreadyDecoded),
            TransportState::EncodedReal => {
                let decoded = rle::decode_bounded(&self.data, self.config.max_input_size)?;
                tracing::debug!(
                    encoded_len = self.data.len(),
                    decoded_len = decoded.len(),
                    "decoded transport payload"
                );
                self.data = decoded;
            }
            TransportState::EncodedPseudo => {
                tracing::debug!(len = self.data.len(), "pseudo-encoded payload left unchanged");
            }
        }
        self.state = TransportState::Raw;
        Ok(())
    }

    /// Current payload: text, or tokens when really encoded.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Consume the transport and return its payload.
    pub fn into_data(self) -> String {
        self.data
    }

    /// Current encoding state.
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Whether the payload is logically encoded, pseudo or real.
    pub fn is_encoded(&self) -> bool {
        self.state.is_encoded()
    }

    /// Whether the last encode kept the original text.
    pub fn is_pseudo_encoded(&self) -> bool {
        self.state.is_pseudo_encoded()
    }

    /// Config this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Snapshot the payload and flags as a transport record.
    pub fn to_record(&self) -> TransportRecord {
        TransportRecord {
            data: self.data.clone(),
            encoded: self.is_encoded(),
            pseudo_encoded: self.is_pseudo_encoded(),
        }
    }

    /// Serialize the transport record to JSON.
    pub fn to_json(&self) -> Result<String, TransportError> {
        self.to_record().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_raw() {
        let transport = Transport::new("aaabbb").unwrap();
        assert_eq!(transport.data(), "aaabbb");
        assert_eq!(transport.state(), TransportState::Raw);
        assert!(!transport.is_encoded());
        assert!(!transport.is_pseudo_encoded());
    }

    #[test]
    fn test_encode_real() {
        let mut transport = Transport::new("aaabbb").unwrap();
        transport.encode().unwrap();
        assert_eq!(transport.data(), "3a 3b");
        assert_eq!(transport.state(), TransportState::EncodedReal);
    }

    #[test]
    fn test_encode_pseudo() {
        let mut transport = Transport::new("a b").unwrap();
        transport.encode().unwrap();
        assert_eq!(transport.data(), "a b");
        assert!(transport.is_encoded());
        assert!(transport.is_pseudo_encoded());
    }

    #[test]
    fn test_equal_length_is_pseudo() {
        // "aa" -> "2a"
        let mut transport = Transport::new("aa").unwrap();
        transport.encode().unwrap();
        assert_eq!(transport.data(), "aa");
        assert_eq!(transport.state(), TransportState::EncodedPseudo);
    }

    #[test]
    fn test_length_metric_is_bytes() {
        let mut transport = Transport::new("éé").unwrap();
        transport.encode().unwrap();
        assert_eq!(transport.data(), "2é");
        assert_eq!(transport.state(), TransportState::EncodedReal);
        transport.decode().unwrap();
        assert_eq!(transport.data(), "éé");
    }

    #[test]
    fn test_empty_is_pseudo() {
        let mut transport = Transport::new("").unwrap();
        transport.encode().unwrap();
        assert_eq!(transport.data(), "");
        assert_eq!(transport.state(), TransportState::EncodedPseudo);
        transport.decode().unwrap();
        assert_eq!(transport.data(), "");
        assert_eq!(transport.state(), TransportState::Raw);
    }

    #[test]
    fn test_double_encode_fails() {
        let mut transport = Transport::new("aaabbb").unwrap();
        transport.encode().unwrap();
        let err = transport.encode().unwrap_err();
        assert!(matches!(err, TransportError::AlreadyEncoded));
        assert_eq!(transport.data(), "3a 3b");
        assert_eq!(transport.state(), TransportState::EncodedReal);
    }

    #[test]
    fn test_decode_raw_fails() {
        let mut transport = Transport::new("abc").unwrap();
        assert!(matches!(
            transport.decode(),
            Err(TransportError::AlreadyDecoded)
        ));
        assert_eq!(transport.state(), TransportState::Raw);
    }

    #[test]
    fn test_decode_pseudo_leaves_data() {
        let mut transport = Transport::new("122333").unwrap();
        transport.encode().unwrap();
        assert!(transport.is_pseudo_encoded());
        transport.decode().unwrap();
        assert_eq!(transport.data(), "122333");
        assert_eq!(transport.state(), TransportState::Raw);
    }

    #[test]
    fn test_decode_failure_keeps_state() {
        let mut transport = Transport::from_text("3a xb", true).unwrap();
        assert!(matches!(
            transport.decode(),
            Err(TransportError::MalformedToken { .. })
        ));
        assert_eq!(transport.data(), "3a xb");
        assert_eq!(transport.state(), TransportState::EncodedReal);
    }

    #[test]
    fn test_force_encode_from_raw() {
        let mut transport = Transport::new("aaabbb").unwrap();
        transport.force_encode().unwrap();
        assert_eq!(transport.data(), "3a 3b");
        assert_eq!(transport.state(), TransportState::EncodedReal);
    }

    #[test]
    fn test_force_encode_pseudo_payload() {
        let mut transport = Transport::new("a b").unwrap();
        transport.encode().unwrap();
        transport.force_encode().unwrap();
        assert_eq!(transport.data(), "a b");
        assert_eq!(transport.state(), TransportState::EncodedPseudo);
    }

    #[test]
    fn test_force_encode_disabled() {
        let config = TransportConfig {
            allow_forced_encode: false,
            ..TransportConfig::default()
        };
        let mut transport = Transport::from_text_with_config("aaa", false, config).unwrap();
        assert!(matches!(
            transport.force_encode(),
            Err(TransportError::ForcedEncodeDisabled)
        ));
        assert_eq!(transport.state(), TransportState::Raw);
    }

    #[test]
    fn test_from_text_encoded() {
        let mut transport = Transport::from_text("3a 3b", true).unwrap();
        assert_eq!(transport.state(), TransportState::EncodedReal);
        transport.decode().unwrap();
        assert_eq!(transport.data(), "aaabbb");
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(TransportState::from_flags(false, false), TransportState::Raw);
        assert_eq!(TransportState::from_flags(false, true), TransportState::Raw);
        assert_eq!(
            TransportState::from_flags(true, false),
            TransportState::EncodedReal
        );
        assert_eq!(
            TransportState::from_flags(true, true),
            TransportState::EncodedPseudo
        );
    }

    #[test]
    fn test_record_roundtrip_all_states() {
        let raw = Transport::new("aaabbb").unwrap();
        let mut real = raw.clone();
        real.encode().unwrap();
        let mut pseudo = Transport::new("a b").unwrap();
        pseudo.encode().unwrap();

        for transport in [raw, real, pseudo] {
            let restored = Transport::from_record(transport.to_record()).unwrap();
            assert_eq!(restored.data(), transport.data());
            assert_eq!(restored.state(), transport.state());
        }
    }

    #[test]
    fn test_size_limit() {
        let config = TransportConfig {
            max_input_size: 3,
            ..TransportConfig::default()
        };
        assert!(matches!(
            Transport::from_text_with_config("abcd", false, config.clone()),
            Err(TransportError::InputTooLarge { size: 4, limit: 3 })
        ));
        assert!(Transport::from_text_with_config("abc", false, config).is_ok());
    }

    #[test]
    fn test_decode_respects_size_limit() {
        let config = TransportConfig {
            max_input_size: 5,
            ..TransportConfig::default()
        };
        let mut transport = Transport::from_text_with_config("9a", true, config).unwrap();
        assert!(matches!(
            transport.decode(),
            Err(TransportError::InputTooLarge { .. })
        ));
        assert_eq!(transport.data(), "9a");
        assert!(transport.is_encoded());
    }
}
