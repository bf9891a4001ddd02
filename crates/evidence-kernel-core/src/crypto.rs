//! Cryptographic primitives: SHA-256/SHA-512 hashing and secp256k1 ECDSA.
//!
//! Wraps `k256` signing with strong types. Signatures are deterministic
//! (RFC 6979), normalized to low-S, and DER-encoded.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

use crate::error::{CoreError, Result};

/// Length of a raw secp256k1 private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Derive the 32-byte ECDSA prehash from a fingerprint hash in hex form.
///
/// The hex *text* is hashed: SHA-512 over its ASCII bytes, truncated to the
/// first 32 bytes. It is never decoded back to the raw SHA-256 output first.
/// Network verifiers derive the digest exactly this way, so this function must
/// not be "simplified".
pub fn signing_digest(fingerprint_hex: &str) -> [u8; 32] {
    let wide = Sha512::digest(fingerprint_hex.as_bytes());
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&wide[..32]);
    digest
}

/// A secp256k1 signing key.
///
/// Private key custody is the caller's concern: the kernel only ever receives
/// raw key material for the duration of a signing call.
#[derive(Clone)]
pub struct SigningKeypair {
    signing_key: SigningKey,
}

impl SigningKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from a raw 32-byte scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CoreError::KeyFormat(format!(
                "expected {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| {
            CoreError::KeyFormat("scalar is zero or not below the curve order".into())
        })?;
        Ok(Self { signing_key })
    }

    /// Parse a 64-character hex private key. A leading `0x` is accepted.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != PRIVATE_KEY_LEN * 2 {
            return Err(CoreError::KeyFormat(format!(
                "expected {} hex characters, got {}",
                PRIVATE_KEY_LEN * 2,
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|e| CoreError::KeyFormat(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().clone())
    }

    /// Sign a 32-byte prehash. Returns the low-S signature, DER-encoded.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CoreError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKeypair({:?})", self.public_key())
    }
}

/// A secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Uncompressed SEC1 encoding (`04 || X || Y`) as lowercase hex, 130 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_encoded_point(false).as_bytes())
    }

    /// Parse from hex.
    ///
    /// Accepts uncompressed (130 chars), uncompressed without the `04` tag
    /// (128 chars), and compressed (66 chars) encodings.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s).map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;
        if bytes.len() == 64 {
            bytes.insert(0, 0x04);
        }
        VerifyingKey::from_sec1_bytes(&bytes)
            .map(Self)
            .map_err(|_| CoreError::InvalidPublicKey(format!("not a secp256k1 point: {s}")))
    }

    /// Verify a DER signature over a 32-byte prehash.
    ///
    /// High-S signatures are rejected.
    pub fn verify_digest(&self, digest: &[u8; 32], signature_der: &[u8]) -> Result<()> {
        let signature =
            Signature::from_der(signature_der).map_err(|_| CoreError::InvalidSignature)?;
        if signature.normalize_s().is_some() {
            return Err(CoreError::InvalidSignature);
        }
        self.0
            .verify_prehash(digest, &signature)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..18])
    }
}
