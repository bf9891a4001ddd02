//! SignedFingerprint: content plus signature proofs.
//!
//! Signing pipeline (must be reproduced bit-for-bit by every verifier):
//!
//! 1. canonical = RFC 8785 JSON of the content
//! 2. fingerprint = lowercase hex of SHA-256(UTF-8(canonical))
//! 3. digest = first 32 bytes of SHA-512(UTF-8(fingerprint))
//! 4. signature = ECDSA secp256k1 over digest, low-S, DER, hex
//! 5. proof id = uncompressed public key, hex

use serde::{Deserialize, Serialize};

use crate::canonical::canonicalize;
use crate::crypto::{sha256_hex, signing_digest, PublicKey, SigningKeypair};
use crate::error::{CoreError, Result};
use crate::fingerprint::FingerprintValue;
use crate::types::FingerprintHash;

/// Algorithm tag carried by every proof this kernel produces.
pub const PROOF_ALGORITHM: &str = "SECP256K1_RFC8785_V1";

/// One signature over a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureProof {
    /// Signer public key, hex.
    pub id: String,
    /// DER-encoded ECDSA signature, hex.
    pub signature: String,
    pub algorithm: String,
}

/// A fingerprint with its proofs.
///
/// Signing produces exactly one proof; the list shape leaves room for
/// co-signers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedFingerprint {
    pub content: FingerprintValue,
    pub proofs: Vec<SignatureProof>,
}

impl SignedFingerprint {
    /// Fingerprint hash of the signed content.
    pub fn fingerprint_hash(&self) -> Result<FingerprintHash> {
        calculate_fingerprint_hash(&self.content)
    }

    /// Verify every proof against the content.
    pub fn verify(&self) -> Result<()> {
        verify_signed_fingerprint(self)
    }
}

/// SHA-256 over the canonical JSON of `value`.
pub fn calculate_fingerprint_hash<T: Serialize + ?Sized>(value: &T) -> Result<FingerprintHash> {
    let canonical = canonicalize(value)?;
    FingerprintHash::from_hex(&sha256_hex(canonical.as_bytes()))
}

/// Sign a fingerprint value.
///
/// Any failure aborts before a proof exists: a value is either fully signed or
/// not signed at all.
pub fn sign_fingerprint(
    value: &FingerprintValue,
    keypair: &SigningKeypair,
) -> Result<SignedFingerprint> {
    let fingerprint = calculate_fingerprint_hash(value)?;
    let digest = signing_digest(&fingerprint.to_hex());
    let signature = keypair.sign_digest(&digest)?;

    Ok(SignedFingerprint {
        content: value.clone(),
        proofs: vec![SignatureProof {
            id: keypair.public_key().to_hex(),
            signature: hex::encode(signature),
            algorithm: PROOF_ALGORITHM.to_string(),
        }],
    })
}

/// Sign with a raw hex private key.
pub fn sign_fingerprint_with_hex_key(
    value: &FingerprintValue,
    private_key_hex: &str,
) -> Result<SignedFingerprint> {
    let keypair = SigningKeypair::from_hex(private_key_hex)?;
    sign_fingerprint(value, &keypair)
}

/// Verify all proofs of a signed fingerprint.
pub fn verify_signed_fingerprint(signed: &SignedFingerprint) -> Result<()> {
    if signed.proofs.is_empty() {
        return Err(CoreError::MissingProof);
    }

    let fingerprint = calculate_fingerprint_hash(&signed.content)?;
    let digest = signing_digest(&fingerprint.to_hex());

    for proof in &signed.proofs {
        if proof.algorithm != PROOF_ALGORITHM {
            return Err(CoreError::UnsupportedAlgorithm(proof.algorithm.clone()));
        }
        let public_key = PublicKey::from_hex(&proof.id)?;
        let der = hex::decode(&proof.signature).map_err(|_| CoreError::InvalidSignature)?;
        public_key.verify_digest(&digest, &der)?;
    }
    Ok(())
}
