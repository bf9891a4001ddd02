//! # Evidence Kernel Net
//!
//! Talks to the outside world on behalf of the kernel: submits signed
//! fingerprints to the attestation API and publishes, validates and retrieves
//! payloads on the ledger network.
//!
//! ## Failover
//!
//! The ledger exposes several redundant, load-balanced endpoints. Every ledger
//! operation walks its endpoint list in order through one primitive,
//! [`first_success`]:
//!
//! ```text
//! endpoint A ──fail──> endpoint B ──fail──> endpoint C ──ok──> done
//!      │                    │                                  (D never contacted)
//!      └── reason ──────────┴── reasons joined if all fail
//! ```
//!
//! Attempts are never parallel, so a publish performs at most one successful
//! write. A [`CancellationToken`](tokio_util::sync::CancellationToken) is
//! checked before each attempt.
//!
//! ## Transport
//!
//! HTTP goes through the [`Transport`] trait. [`ReqwestTransport`] is the
//! production implementation; [`transport::memory::ScriptedTransport`] replays
//! scripted responses and records every call for tests.

pub mod endpoints;
pub mod error;
pub mod failover;
pub mod ledger;
pub mod messages;
pub mod submit;
pub mod transport;

pub use endpoints::Network;
pub use error::{EndpointFailure, NetError, Result};
pub use failover::{first_success, Success};
pub use ledger::{LedgerClient, LedgerReader, Published, LOGGED_DATA_ENDPOINTS};
pub use messages::{FingerprintSubmission, SubmissionMetadata, SubmissionResultItem, TxRecord};
pub use submit::{Submitter, API_KEY_HEADER};
pub use transport::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, DEFAULT_TIMEOUT,
};

pub use tokio_util::sync::CancellationToken;
