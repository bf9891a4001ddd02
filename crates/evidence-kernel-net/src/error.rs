//! Error types for the network module.

use std::fmt;

use thiserror::Error;

/// Why a single endpoint was abandoned during a failover sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    /// Base URL of the endpoint.
    pub endpoint: String,
    /// Human-readable reason.
    pub reason: String,
    /// True when the endpoint could not be reached or was temporarily
    /// unavailable (connection, timeout, 408, 429, 5xx).
    pub unreachable: bool,
    /// True when the endpoint answered that the item is absent or did not
    /// match.
    pub definite: bool,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

/// Errors that can occur while talking to ledger or attestation endpoints.
#[derive(Debug, Error)]
pub enum NetError {
    /// Endpoint answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Response body could not be interpreted.
    #[error("malformed response: {0}")]
    Parse(String),

    /// The endpoint answered, but the requested transaction is not there.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller cancelled the operation between endpoint attempts.
    #[error("operation cancelled")]
    Cancelled,

    /// Every endpoint in the list failed.
    #[error("all {} endpoints failed: {}", .failures.len(), join_failures(.failures))]
    AllEndpointsFailed { failures: Vec<EndpointFailure> },

    /// Building or signing the payload failed.
    #[error("core error: {0}")]
    Core(#[from] evidence_kernel_core::CoreError),
}

impl NetError {
    /// Connection failures, timeouts and statuses that ask the caller to come
    /// back later (408, 429, 5xx).
    pub fn is_unreachable(&self) -> bool {
        match self {
            NetError::Network(_) | NetError::Timeout(_) => true,
            NetError::Http { status, .. } => matches!(*status, 408 | 429) || *status >= 500,
            _ => false,
        }
    }

    /// The endpoint answered, and the answer was a miss: nothing under that
    /// key, or a record that could not be used.
    pub fn is_definite(&self) -> bool {
        matches!(self, NetError::NotFound(_) | NetError::Parse(_))
    }

    /// Per-endpoint failures, if this is an exhausted failover.
    pub fn failures(&self) -> &[EndpointFailure] {
        match self {
            NetError::AllEndpointsFailed { failures } => failures,
            _ => &[],
        }
    }
}

fn join_failures(failures: &[EndpointFailure]) -> String {
    if failures.is_empty() {
        return "no endpoints configured".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetError>;
