//! Module: serialize — CBOR row codec.
//!
//! Responsibility: encode and decode row documents with bounded payloads.
//! Does not own: storage layout or key encodings.

use crate::error::InternalError;
use serde::{Serialize, de::DeserializeOwned};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("payload is {len} bytes, limit is {max_bytes}")]
    SizeLimitExceeded { len: usize, max_bytes: usize },
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::serialize_internal(err.to_string())
    }
}

/// Serialize a value to CBOR bytes.
///
/// serde_cbor can panic on pathological inputs, so the call is wrapped
/// and surfaced as a `SerializeError` instead.
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    let result = catch_unwind(AssertUnwindSafe(|| serde_cbor::to_vec(value)));

    match result {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(err)) => Err(SerializeError::Serialize(err.to_string())),
        Err(_) => Err(SerializeError::Serialize(
            "panic during cbor serialization".to_string(),
        )),
    }
}

/// Deserialize a value from CBOR bytes.
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    let result = catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice::<T>(bytes)));

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(SerializeError::Deserialize(err.to_string())),
        Err(_) => Err(SerializeError::Deserialize(
            "panic during cbor deserialization".to_string(),
        )),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct Doc {
        id: u64,
        name: String,
    }

    #[test]
    fn roundtrip_preserves_document() {
        let doc = Doc {
            id: 7,
            name: "glacier".to_string(),
        };
        let bytes = serialize(&doc).unwrap();
        let back: Doc = deserialize(&bytes).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let err = deserialize::<Doc>(&[0xFF, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, SerializeError::Deserialize(_)));
    }
}
