//! The Attestor: unified API for the Evidence Kernel.
//!
//! The Attestor brings together fingerprint signing, submission, ledger
//! access and tamper-proof validation behind one configured value.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;

use evidence_kernel_core::{
    sign_fingerprint, FingerprintBuilder, FingerprintHash, FingerprintValue, SignedFingerprint,
    SigningKeypair,
};
use evidence_kernel_net::{
    LedgerClient, Published, ReqwestTransport, SubmissionMetadata, SubmissionResultItem,
    Submitter, Transport,
};

use crate::config::KernelConfig;
use crate::error::Result;
use crate::tamper::{LocalRecord, TamperProofValidator, ValidationResult};

/// A signed and submitted fingerprint.
#[derive(Debug, Clone)]
pub struct Attestation {
    pub signed: SignedFingerprint,
    pub hash: FingerprintHash,
    /// Public explorer link for `hash`.
    pub explorer_url: String,
    /// Per-item results from the attestation API.
    pub results: Vec<SubmissionResultItem>,
}

/// The main Attestor struct.
///
/// Holds the immutable configuration and one shared transport. All network
/// operations are independent; the Attestor itself has no mutable state.
pub struct Attestor<T: Transport = ReqwestTransport> {
    config: KernelConfig,
    submitter: Submitter<Arc<T>>,
    validator: TamperProofValidator<LedgerClient<Arc<T>>>,
}

impl Attestor<ReqwestTransport> {
    /// Create an Attestor that talks HTTP with the configured timeout.
    pub fn from_config(config: KernelConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Attestor<T> {
    /// Create an Attestor over any transport.
    pub fn with_transport(config: KernelConfig, transport: T) -> Self {
        let transport = Arc::new(transport);
        let submitter = Submitter::new(transport.clone(), &config.attestation_base_url);
        let ledger = LedgerClient::new(
            transport,
            config.ledger_endpoints.clone(),
            config.validation_endpoints.clone(),
        );
        Self {
            config,
            submitter,
            validator: TamperProofValidator::new(ledger),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn ledger(&self) -> &LedgerClient<Arc<T>> {
        self.validator.ledger()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fingerprints
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a fingerprint with a fresh event id and the current time.
    ///
    /// Use [`FingerprintBuilder`] directly to set the optional fields.
    pub fn create_fingerprint(
        &self,
        org_id: &str,
        tenant_id: &str,
        document_id: &str,
        document_ref: &str,
    ) -> Result<FingerprintValue> {
        Ok(FingerprintBuilder::new(org_id, tenant_id, document_id, document_ref).build()?)
    }

    pub fn fingerprint_hash(&self, value: &FingerprintValue) -> Result<FingerprintHash> {
        Ok(value.fingerprint_hash()?)
    }

    pub fn sign(
        &self,
        value: &FingerprintValue,
        keypair: &SigningKeypair,
    ) -> Result<SignedFingerprint> {
        Ok(sign_fingerprint(value, keypair)?)
    }

    /// Sign with a raw hex private key.
    pub fn sign_with_hex_key(
        &self,
        value: &FingerprintValue,
        private_key_hex: &str,
    ) -> Result<SignedFingerprint> {
        let keypair = SigningKeypair::from_hex(private_key_hex)?;
        self.sign(value, &keypair)
    }

    /// Deep link to the explorer page of a fingerprint.
    pub fn explorer_url(&self, hash: &FingerprintHash) -> String {
        format!("{}/fingerprint/{}", self.config.explorer_base_url, hash.to_hex())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit a signed fingerprint to the attestation API.
    ///
    /// Fails with a configuration error before any request if no API key is
    /// configured.
    pub async fn submit(
        &self,
        signed: &SignedFingerprint,
        metadata: Option<SubmissionMetadata>,
    ) -> Result<Vec<SubmissionResultItem>> {
        let api_key = self.config.require_api_key()?;
        Ok(self.submitter.submit(signed, api_key, metadata).await?)
    }

    /// Sign `value` and submit it with its fingerprint hash as metadata.
    ///
    /// Signing completes before anything is sent.
    pub async fn attest(
        &self,
        value: &FingerprintValue,
        keypair: &SigningKeypair,
    ) -> Result<Attestation> {
        let api_key = self.config.require_api_key()?;
        let signed = self.sign(value, keypair)?;
        let hash = signed.fingerprint_hash()?;
        let metadata = SubmissionMetadata::with_fingerprint_hash(&signed)?;

        let results = self.submitter.submit(&signed, api_key, Some(metadata)).await?;
        let explorer_url = self.explorer_url(&hash);
        info!(event_id = value.event_id(), %hash, "fingerprint attested");

        Ok(Attestation {
            signed,
            hash,
            explorer_url,
            results,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ledger
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn publish(&self, payload: &Value) -> Result<Published> {
        Ok(self.ledger().publish(payload).await?)
    }

    pub async fn publish_with_cancel(
        &self,
        payload: &Value,
        cancel: &CancellationToken,
    ) -> Result<Published> {
        Ok(self.ledger().publish_with_cancel(payload, cancel).await?)
    }

    pub async fn validate_hash(&self, hash: &str) -> Result<bool> {
        Ok(self.ledger().validate_hash(hash).await?)
    }

    pub async fn validate_hash_with_cancel(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        Ok(self.ledger().validate_hash_with_cancel(hash, cancel).await?)
    }

    pub async fn logged_data(&self, hash: &str) -> Result<Option<Value>> {
        Ok(self.ledger().logged_data(hash).await?)
    }

    pub async fn logged_data_with_cancel(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        Ok(self.ledger().logged_data_with_cancel(hash, cancel).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// See [`TamperProofValidator::validate_tamper_proof`].
    pub async fn validate_tamper_proof(&self, record: &LocalRecord) -> ValidationResult {
        self.validator.validate_tamper_proof(record).await
    }

    pub async fn validate_tamper_proof_with_cancel(
        &self,
        record: &LocalRecord,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        Ok(self
            .validator
            .validate_tamper_proof_with_cancel(record, cancel)
            .await?)
    }
}
