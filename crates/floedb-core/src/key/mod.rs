//! Module: key — primary-key values and their order-preserving codec.
//!
//! Responsibility: the `Key` value type and a fixed-size byte encoding whose
//! bytewise order equals `Ord`.
//! Does not own: index-key composition or sentinel handling.


use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

const TAG_INT: u8 = 0;
const TAG_UINT: u8 = 1;

///
/// Key
///
/// A typed primary-key value.
///
/// The encoding is a tag byte followed by an 8-byte big-endian payload.
/// Signed values are sign-biased so that unsigned byte comparison of the
/// payload matches signed numeric order.
///

#[derive(
    Clone, Copy, Debug, Display, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Key {
    #[display("Int({_0})")]
    Int(i64),

    #[display("Uint({_0})")]
    Uint(u64),
}

impl Key {
    /// Encoded size in bytes: 1 tag byte + 8 payload bytes.
    pub const STORED_SIZE: usize = 9;

    /// Encode to the fixed-size, order-preserving representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::STORED_SIZE] {
        let mut buf = [0u8; Self::STORED_SIZE];

        match self {
            Self::Int(v) => {
                buf[0] = TAG_INT;
                let biased = (*v).cast_unsigned() ^ (1u64 << 63);
                buf[1..].copy_from_slice(&biased.to_be_bytes());
            }
            Self::Uint(v) => {
                buf[0] = TAG_UINT;
                buf[1..].copy_from_slice(&v.to_be_bytes());
            }
        }

        buf
    }

    /// Decode from the fixed-size representation.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() != Self::STORED_SIZE {
            return Err(KeyDecodeError::InvalidLength { len: bytes.len() });
        }

        let mut payload = [0u8; 8];
        payload.copy_from_slice(&bytes[1..]);
        let raw = u64::from_be_bytes(payload);

        match bytes[0] {
            TAG_INT => Ok(Self::Int((raw ^ (1u64 << 63)).cast_signed())),
            TAG_UINT => Ok(Self::Uint(raw)),
            tag => Err(KeyDecodeError::InvalidTag { tag }),
        }
    }

    /// 16-byte fingerprint used as an index-key component.
    ///
    /// Layout: encoded key in bytes 0..9, zero padding after.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 16] {
        let mut buf = [0u8; 16];
        buf[..Self::STORED_SIZE].copy_from_slice(&self.to_bytes());

        buf
    }
}

///
/// KeyDecodeError
///

#[derive(Debug, ThisError)]
pub enum KeyDecodeError {
    #[error("invalid key length: {len}")]
    InvalidLength { len: usize },

    #[error("invalid key tag: {tag}")]
    InvalidTag { tag: u8 },
}
