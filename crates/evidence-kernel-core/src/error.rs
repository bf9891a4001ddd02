//! Error types for the Evidence Kernel Core.

use thiserror::Error;

/// Errors raised while producing canonical JSON.
#[derive(Debug, Error)]
pub enum CanonicalizationError {
    /// The value could not be converted to JSON (e.g. a map with non-string keys).
    #[error("value is not serializable: {0}")]
    NotSerializable(String),

    /// NaN or an infinity was found.
    #[error("non-finite number at {0}")]
    NonFiniteNumber(String),

    /// The value nests deeper than the canonicalizer accepts.
    #[error("nesting exceeds {max} levels at {path}")]
    TooDeep { path: String, max: usize },

    /// The canonical serializer rejected the value.
    #[error("canonical encoding failed: {0}")]
    Encoding(String),
}

/// Core errors that can occur while building, hashing, signing or verifying
/// fingerprints.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    #[error("malformed signing key: {0}")]
    KeyFormat(String),

    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("malformed hash: {0}")]
    MalformedHash(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("unsupported proof algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("signed fingerprint carries no proofs")]
    MissingProof,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
