//! Strong type definitions for the Evidence Kernel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 32-byte fingerprint hash: SHA-256 over the canonical JSON of a
/// [`FingerprintValue`](crate::FingerprintValue).
///
/// Its 64-character lowercase hex form is the public identifier used in
/// explorer deep-links and ledger lookups.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FingerprintHash(pub [u8; 32]);

impl FingerprintHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string (either case).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::MalformedHash(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::MalformedHash(format!("expected 32 bytes in {s:?}")))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for FingerprintHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FingerprintHash({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for FingerprintHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for FingerprintHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for FingerprintHash {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<FingerprintHash> for String {
    fn from(hash: FingerprintHash) -> Self {
        hash.to_hex()
    }
}

impl AsRef<[u8]> for FingerprintHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let hash = FingerprintHash::from_bytes([0xab; 32]);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(FingerprintHash::from_hex(&hex).unwrap(), hash);
    }

    #[test]
    fn test_uppercase_input_normalized() {
        let hash = FingerprintHash::from_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(hash.to_string(), "ab".repeat(32));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            FingerprintHash::from_hex("abcd"),
            Err(CoreError::MalformedHash(_))
        ));
        assert!(FingerprintHash::from_hex("zz").is_err());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let hash = FingerprintHash::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: FingerprintHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
