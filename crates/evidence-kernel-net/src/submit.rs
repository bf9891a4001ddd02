//! Submission of signed fingerprints to the attestation API.

use tracing::{info, warn};

use evidence_kernel_core::SignedFingerprint;

use crate::endpoints::normalize_endpoint;
use crate::error::{NetError, Result};
use crate::messages::{FingerprintSubmission, SubmissionMetadata, SubmissionResultItem};
use crate::transport::{HttpRequest, Transport};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Posts signed fingerprints to `{base_url}/fingerprints`.
///
/// One request per call, no retries.
#[derive(Debug, Clone)]
pub struct Submitter<T: Transport> {
    transport: T,
    base_url: String,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: normalize_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/fingerprints", self.base_url)
    }

    /// Submit one signed fingerprint.
    ///
    /// The API always takes a batch, so the body is a single-element array and
    /// the response holds one [`SubmissionResultItem`] per element.
    pub async fn submit(
        &self,
        signed: &SignedFingerprint,
        api_key: &str,
        metadata: Option<SubmissionMetadata>,
    ) -> Result<Vec<SubmissionResultItem>> {
        if api_key.trim().is_empty() {
            return Err(NetError::Configuration("API key is empty".into()));
        }

        let batch = [FingerprintSubmission {
            attestation: signed.clone(),
            metadata,
        }];
        let body = serde_json::to_value(&batch).map_err(|e| NetError::Parse(e.to_string()))?;

        let url = self.endpoint();
        let response = self
            .transport
            .send(HttpRequest::post_json(&url, body).header(API_KEY_HEADER, api_key))
            .await?;
        if !response.is_success() {
            warn!(status = response.status, url = %url, "submission rejected");
        }
        let items: Vec<SubmissionResultItem> = response.error_for_status(&url)?.json()?;

        info!(
            event_id = signed.content.event_id(),
            accepted = items.iter().filter(|i| i.accepted == Some(true)).count(),
            "fingerprint submitted"
        );
        Ok(items)
    }
}
