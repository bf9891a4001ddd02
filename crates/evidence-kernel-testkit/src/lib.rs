//! # Evidence Kernel Testkit
//!
//! Testing utilities for the Evidence Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned canonical JSON, hashes, digests and public keys
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic keys, sample records and scripted endpoints
//!
//! ## Golden Vectors
//!
//! ```rust
//! use evidence_kernel_testkit::vectors::verify_all_vectors;
//!
//! assert!(verify_all_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use evidence_kernel_testkit::generators::fingerprint_value;
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(value in fingerprint_value()) {
//!         prop_assert_eq!(value.fingerprint_hash().unwrap(), value.fingerprint_hash().unwrap());
//!     }
//! }
//! ```
//!
//! ## Scripted Endpoints
//!
//! ```rust
//! use evidence_kernel_net::transport::memory::ScriptedTransport;
//! use evidence_kernel_testkit::fixtures::{accepting_ledger, ledger_with_record, sample_record};
//!
//! let transport = accepting_ledger(ScriptedTransport::new(), "https://l0", "tx-1");
//! let transport = ledger_with_record(transport, "https://l0", "tx-1", &sample_record("r1"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{keypair, sample_fingerprint, sample_record};
pub use vectors::{all_vectors, fingerprint_from_vector, verify_all_vectors, GoldenVector};
