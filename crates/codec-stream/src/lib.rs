//! Repeating-key XOR codec with involutive transform guarantees.
//!
//! The transform combines each payload byte with a key byte, cycling the key
//! index once the payload outruns the key. Applying it twice with the same
//! key restores the original bytes. It operates on raw 8-bit units and never
//! interprets the payload as text, so any byte sequence round-trips.
//!
//! This is an obfuscation codec, not a cipher; do not use it to protect
//! sensitive data.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A codec holding a validated, non-empty repeating key.
///
/// The key is copied at construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StreamCodec {
    key: Vec<u8>,
}

impl StreamCodec {
    /// Builds a codec, rejecting an empty key before any transform can run.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, CodecError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CodecError::InvalidArgument("key must not be empty".into()));
        }
        Ok(Self { key })
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns the transformed copy of `source`.
    ///
    /// The output length always equals the source length. Running the result
    /// through `transform` again with the same codec yields `source` back.
    pub fn transform(&self, source: &[u8]) -> Result<Vec<u8>, CodecError> {
        if source.is_empty() {
            return Err(CodecError::InvalidArgument(
                "source must not be empty".into(),
            ));
        }
        let mut out = source.to_vec();
        self.transform_in_place(&mut out)?;
        Ok(out)
    }

    /// In-place variant for callers that already own a mutable buffer.
    pub fn transform_in_place(&self, buf: &mut [u8]) -> Result<(), CodecError> {
        if buf.is_empty() {
            return Err(CodecError::InvalidArgument(
                "source must not be empty".into(),
            ));
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte ^= self.key[i % self.key.len()];
        }
        Ok(())
    }
}

/// One-shot helper for callers that do not want to hold a codec value.
pub fn transform(source: &[u8], key: &[u8]) -> Result<Vec<u8>, CodecError> {
    StreamCodec::new(key)?.transform(source)
}
