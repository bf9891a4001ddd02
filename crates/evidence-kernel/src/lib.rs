//! # Evidence Kernel
//!
//! The unified API for issuing and checking tamper-evident document
//! attestations ("fingerprints").
//!
//! ## Overview
//!
//! - **Fingerprints**: Immutable envelopes binding a document reference to an
//!   organization, event and time
//! - **Signing**: RFC 8785 canonical JSON, SHA-256, secp256k1 proofs
//! - **Submission**: Signed fingerprints posted to the attestation API
//! - **Ledger**: Publish, validate and retrieve through redundant endpoints
//! - **Tamper-proof validation**: Local records checked against the ledger at
//!   escalating confidence levels
//!
//! ## Usage
//!
//! ```rust,no_run
//! use evidence_kernel::{Attestor, KernelConfig};
//! use evidence_kernel::core::SigningKeypair;
//!
//! async fn example() -> evidence_kernel::Result<()> {
//!     let config = KernelConfig::from_env()?;
//!     let attestor = Attestor::from_config(config)?;
//!
//!     let keypair = SigningKeypair::from_hex(&std::env::var("SIGNING_KEY").unwrap_or_default())?;
//!     let value = attestor.create_fingerprint("org", "tenant", "invoice-7", "9f86d081884c7d65")?;
//!
//!     let attestation = attestor.attest(&value, &keypair).await?;
//!     println!("{}", attestation.explorer_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `evidence_kernel::core` - Fingerprints, canonical JSON, signatures
//! - `evidence_kernel::net` - Transport, failover, ledger and submission clients

pub mod attestor;
pub mod config;
pub mod error;
pub mod tamper;

// Re-export component crates
pub use evidence_kernel_core as core;
pub use evidence_kernel_net as net;

// Re-export main types for convenience
pub use attestor::{Attestation, Attestor};
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use tamper::{
    compare_records, ConstellationStatus, FieldMismatch, LocalRecord, LoggedRecord, Participant,
    TamperProofValidator, ValidationLevel, ValidationMismatchError, ValidationResult,
};

// Re-export commonly used component types
pub use evidence_kernel_core::{
    FingerprintBuilder, FingerprintHash, FingerprintValue, SignatureProof, SignedFingerprint,
    SigningKeypair,
};
pub use evidence_kernel_net::{
    CancellationToken, Network, Published, SubmissionMetadata, SubmissionResultItem,
};
