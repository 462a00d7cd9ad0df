use std::{fmt, str};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing identifier strings.
#[derive(Debug, Error)]
pub enum IdParseError {
    /// Hex string does not decode to exactly 32 bytes.
    #[error("invalid request id length: expected 64 hex chars, got {0}")]
    InvalidLength(usize),

    /// Hex string contains non-hex characters.
    #[error("invalid hex in request id")]
    InvalidHex(#[from] hex::FromHexError),

    /// Account addresses must be non-empty.
    #[error("empty account address")]
    EmptyAccount,
}

/// ID of a bridge request, assigned by the chain at request creation.
///
/// Rendered as lower hex everywhere (logs, serde, display).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct RequestId([u8; 32]);

impl RequestId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for RequestId {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl str::FromStr for RequestId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(IdParseError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for RequestId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Chain-side account address that owns requests.
///
/// Treated as opaque; the chain client is responsible for interpreting it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Wraps an address string, rejecting empty input.
    pub fn new(addr: impl Into<String>) -> Result<Self, IdParseError> {
        let addr = addr.into();
        if addr.is_empty() {
            return Err(IdParseError::EmptyAccount);
        }
        Ok(Self(addr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
