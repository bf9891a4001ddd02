//! # Evidence Kernel Core
//!
//! Pure primitives for the Evidence Kernel: fingerprints, canonical JSON,
//! and secp256k1 signature proofs.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over the attestation envelope.
//!
//! ## Key Types
//!
//! - [`FingerprintValue`] - The attested content: who, what document, when
//! - [`FingerprintBuilder`] - Fills in event id, timestamp and version defaults
//! - [`FingerprintHash`] - SHA-256 of the canonical JSON, the public identifier
//! - [`SignedFingerprint`] - Content plus one or more [`SignatureProof`]s
//! - [`SigningKeypair`] - A raw secp256k1 signing key
//!
//! ## Canonicalization
//!
//! Every hash and signature is computed over RFC 8785 canonical JSON.
//! See the [`canonical`] module.
//!
//! ## Signing Pipeline
//!
//! ```text
//! canonical JSON ──SHA-256──> fingerprint hash (hex)
//!                               │
//!                               └─SHA-512 over the hex text, first 32 bytes──> digest
//!                                                                                │
//!                                                         ECDSA secp256k1 (low-S, DER)
//! ```

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod fingerprint;
pub mod signed;
pub mod types;

pub use canonical::{canonical_bytes, canonicalize, canonicalize_value};
pub use crypto::{sha256_hex, signing_digest, PublicKey, SigningKeypair};
pub use error::{CanonicalizationError, CoreError, Result};
pub use fingerprint::{FingerprintBuilder, FingerprintValue, DEFAULT_VERSION};
pub use signed::{
    calculate_fingerprint_hash, sign_fingerprint, sign_fingerprint_with_hex_key,
    verify_signed_fingerprint, SignatureProof, SignedFingerprint, PROOF_ALGORITHM,
};
pub use types::FingerprintHash;
