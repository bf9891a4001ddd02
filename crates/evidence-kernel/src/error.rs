//! Error types for the Kernel.

use evidence_kernel_core::CoreError;
use evidence_kernel_net::NetError;
use thiserror::Error;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Building, hashing or signing a fingerprint failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Submission or ledger access failed.
    #[error("network error: {0}")]
    Net(#[from] NetError),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl KernelError {
    /// True when the caller cancelled a multi-endpoint operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, KernelError::Net(NetError::Cancelled))
    }
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
