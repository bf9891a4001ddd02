//! Wire shapes for the ledger and attestation APIs.
//!
//! Ledger responses are loosely typed: a transaction may be identified by
//! `txId`, `hash`, or both, and its payload arrives as a JSON-encoded string
//! in `details`. [`TxRecord::from_json`] normalizes that once at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use evidence_kernel_core::SignedFingerprint;

use crate::error::{NetError, Result};

/// A ledger transaction as returned by `POST /transaction` or
/// `GET /transaction/{hash}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TxRecord {
    pub tx_id: Option<String>,
    pub hash: Option<String>,
    details: Option<Value>,
}

impl TxRecord {
    /// Normalize a raw response body.
    ///
    /// Fails with [`NetError::Parse`] when the body is not an object or carries
    /// neither identifier.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| NetError::Parse("transaction response is not an object".into()))?;

        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let tx_id = field("txId");
        let hash = field("hash");
        if tx_id.is_none() && hash.is_none() {
            return Err(NetError::Parse(
                "transaction response has neither txId nor hash".into(),
            ));
        }

        let details = object.get("details").filter(|v| !v.is_null()).cloned();
        Ok(Self {
            tx_id,
            hash,
            details,
        })
    }

    /// The identifier to report back to callers, `txId` first.
    pub fn primary_hash(&self) -> &str {
        self.tx_id
            .as_deref()
            .or(self.hash.as_deref())
            .unwrap_or_default()
    }

    /// True when either identifier equals `hash` exactly.
    pub fn matches(&self, hash: &str) -> bool {
        self.tx_id.as_deref() == Some(hash) || self.hash.as_deref() == Some(hash)
    }

    /// The logged payload, decoded from `details`.
    ///
    /// `details` is normally a string holding JSON; an inline object is also
    /// accepted. Returns `Ok(None)` when there is no payload.
    pub fn logged_payload(&self) -> Result<Option<Value>> {
        match &self.details {
            None => Ok(None),
            Some(Value::String(encoded)) => serde_json::from_str(encoded)
                .map(Some)
                .map_err(|e| NetError::Parse(format!("details is not valid JSON: {e}"))),
            Some(value @ Value::Object(_)) => Ok(Some(value.clone())),
            Some(other) => Err(NetError::Parse(format!(
                "details has unexpected type: {other}"
            ))),
        }
    }
}

/// Optional metadata sent alongside an attestation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl SubmissionMetadata {
    /// Metadata whose `hash` is the fingerprint hash of `signed`.
    pub fn with_fingerprint_hash(signed: &SignedFingerprint) -> Result<Self> {
        Ok(Self {
            hash: Some(signed.fingerprint_hash()?.to_hex()),
            tags: None,
        })
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// One element of the submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintSubmission {
    pub attestation: SignedFingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SubmissionMetadata>,
}

/// Per-item outcome returned by the attestation API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResultItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}
