//! FingerprintValue: the attested content.
//!
//! A fingerprint binds a document (by caller-supplied content reference) to an
//! organization, tenant, event and point in time. Once created it is never
//! edited: a change is a new fingerprint with a new event id.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::canonicalize;
use crate::crypto::{sha256_hex, SigningKeypair};
use crate::error::{CoreError, Result};
use crate::signed::{sign_fingerprint, SignedFingerprint};
use crate::types::FingerprintHash;

/// Version assigned when the caller does not provide one.
pub const DEFAULT_VERSION: u32 = 1;

/// The attested content of a fingerprint.
///
/// Serialized with camelCase keys. `signerId` is omitted entirely when absent,
/// so it does not participate in the canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintValue {
    org_id: String,
    tenant_id: String,
    event_id: String,
    document_id: String,
    document_ref: String,
    timestamp: String,
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signer_id: Option<String>,
}

impl FingerprintValue {
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Unique per attestation.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Caller-supplied content hash of the underlying document.
    pub fn document_ref(&self) -> &str {
        &self.document_ref
    }

    /// ISO-8601 timestamp, exactly as it is hashed.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn signer_id(&self) -> Option<&str> {
        self.signer_id.as_deref()
    }

    /// Canonical JSON of this value.
    pub fn canonical_json(&self) -> Result<String> {
        Ok(canonicalize(self)?)
    }

    /// SHA-256 over the canonical JSON.
    pub fn fingerprint_hash(&self) -> Result<FingerprintHash> {
        FingerprintHash::from_hex(&sha256_hex(self.canonical_json()?.as_bytes()))
    }
}

/// Builder for fingerprint values.
///
/// Event id defaults to a fresh UUIDv4, timestamp to the current time
/// (`YYYY-MM-DDTHH:MM:SS.mmmZ`), version to [`DEFAULT_VERSION`].
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    org_id: String,
    tenant_id: String,
    document_id: String,
    document_ref: String,
    event_id: Option<String>,
    timestamp: Option<String>,
    version: u32,
    signer_id: Option<String>,
}

impl FingerprintBuilder {
    /// Start a fingerprint for a document.
    ///
    /// `document_ref` is trusted as given; the kernel never hashes document
    /// content itself.
    pub fn new(
        org_id: impl Into<String>,
        tenant_id: impl Into<String>,
        document_id: impl Into<String>,
        document_ref: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            tenant_id: tenant_id.into(),
            document_id: document_id.into(),
            document_ref: document_ref.into(),
            event_id: None,
            timestamp: None,
            version: DEFAULT_VERSION,
            signer_id: None,
        }
    }

    pub fn event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Use a pre-formatted ISO-8601 timestamp verbatim.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Use a point in time, rendered with millisecond precision in UTC.
    pub fn timestamp_at(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(format_timestamp(at));
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn signer_id(mut self, signer_id: impl Into<String>) -> Self {
        self.signer_id = Some(signer_id.into());
        self
    }

    /// Build the value, filling defaults.
    pub fn build(self) -> Result<FingerprintValue> {
        for (field, value) in [
            ("orgId", &self.org_id),
            ("tenantId", &self.tenant_id),
            ("documentId", &self.document_id),
            ("documentRef", &self.document_ref),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidFingerprint(format!("{field} is empty")));
            }
        }
        if self.version == 0 {
            return Err(CoreError::InvalidFingerprint("version must be >= 1".into()));
        }

        let event_id = match self.event_id {
            Some(id) if id.trim().is_empty() => {
                return Err(CoreError::InvalidFingerprint("eventId is empty".into()))
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        Ok(FingerprintValue {
            org_id: self.org_id,
            tenant_id: self.tenant_id,
            event_id,
            document_id: self.document_id,
            document_ref: self.document_ref,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| format_timestamp(Utc::now())),
            version: self.version,
            signer_id: self.signer_id,
        })
    }

    /// Build and sign in one step.
    pub fn sign(self, keypair: &SigningKeypair) -> Result<SignedFingerprint> {
        let value = self.build()?;
        sign_fingerprint(&value, keypair)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
