//! Tamper-proof validation of local records against the ledger.
//!
//! Confidence escalates in three levels, each attempted only if the previous
//! one held:
//!
//! 1. **basic**: the record carries a hash that can be checked externally.
//! 2. **constellation**: the ledger confirms a transaction with that hash.
//! 3. **full**: the payload logged with the transaction equals the record,
//!    field by field, participants compared by position.
//!
//! Outcomes are returned as a [`ValidationResult`], never as an error. A ledger
//! that cannot be reached leaves the status `unknown` with a warning; only a
//! definite "not found" or a mismatch makes the record invalid.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use evidence_kernel_net::{LedgerReader, NetError};

/// A share of a record held by one principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub principal: String,
    /// Accepts a JSON number or a numeric string. Fractions are kept.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Number,
    pub percentage: f64,
}

/// A record as held locally, with the hashes it was attested under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecord {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub participants: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_tx_hash: Option<String>,
}

impl LocalRecord {
    /// The hash to look up on the ledger: the ledger transaction hash when
    /// known, otherwise the fingerprint hash.
    pub fn verifiable_hash(&self) -> Option<&str> {
        fn non_empty(hash: &Option<String>) -> Option<&str> {
            hash.as_deref().map(str::trim).filter(|h| !h.is_empty())
        }
        non_empty(&self.ledger_tx_hash).or_else(|| non_empty(&self.fingerprint_hash))
    }
}

/// A record as logged on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedRecord {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub participants: Vec<Participant>,
}

impl From<&LocalRecord> for LoggedRecord {
    fn from(record: &LocalRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            creator: record.creator.clone(),
            participants: record.participants.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Basic,
    Constellation,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstellationStatus {
    Verified,
    Pending,
    Failed,
    Unknown,
}

/// Outcome of a tamper-proof validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Highest level that held.
    pub level: ValidationLevel,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub constellation_status: ConstellationStatus,
    /// Set when the ledger confirmed the hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
}

impl ValidationResult {
    fn start() -> Self {
        Self {
            is_valid: true,
            level: ValidationLevel::Basic,
            errors: Vec::new(),
            warnings: Vec::new(),
            constellation_status: ConstellationStatus::Pending,
            last_verified: None,
        }
    }

    fn fail(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }
}

/// One field that differs between the local and the logged record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Path of the field, e.g. `participants[1].amount`.
    pub field: String,
    pub local: String,
    pub logged: String,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: local {:?}, logged {:?}",
            self.field, self.local, self.logged
        )
    }
}

/// The full-level comparison failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) differ from the logged record", .mismatches.len())]
pub struct ValidationMismatchError {
    pub mismatches: Vec<FieldMismatch>,
}

/// Compare a local record with its logged counterpart.
///
/// Participants are compared by position. A reordered list is a mismatch even
/// if it holds the same entries. When the lengths differ the overlapping
/// positions are still compared.
pub fn compare_records(
    local: &LocalRecord,
    logged: &LoggedRecord,
) -> Result<(), ValidationMismatchError> {
    let mut mismatches = Vec::new();
    let mut check = |field: String, local: String, logged: String| {
        if local != logged {
            mismatches.push(FieldMismatch {
                field,
                local,
                logged,
            });
        }
    };

    check("id".into(), local.id.clone(), logged.id.clone());
    check("title".into(), local.title.clone(), logged.title.clone());
    check("creator".into(), local.creator.clone(), logged.creator.clone());
    check(
        "participants.length".into(),
        local.participants.len().to_string(),
        logged.participants.len().to_string(),
    );

    for (i, (mine, theirs)) in local
        .participants
        .iter()
        .zip(&logged.participants)
        .enumerate()
    {
        check(
            format!("participants[{i}].principal"),
            mine.principal.clone(),
            theirs.principal.clone(),
        );
        if !same_amount(&mine.amount, &theirs.amount) {
            check(
                format!("participants[{i}].amount"),
                mine.amount.to_string(),
                theirs.amount.to_string(),
            );
        }
        if mine.percentage != theirs.percentage {
            check(
                format!("participants[{i}].percentage"),
                mine.percentage.to_string(),
                theirs.percentage.to_string(),
            );
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(ValidationMismatchError { mismatches })
    }
}

/// Validates local records against the ledger.
#[derive(Debug, Clone)]
pub struct TamperProofValidator<L: LedgerReader> {
    ledger: L,
}

impl<L: LedgerReader> TamperProofValidator<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Validate `record` as far as the available evidence allows.
    pub async fn validate_tamper_proof(&self, record: &LocalRecord) -> ValidationResult {
        match self
            .validate_tamper_proof_with_cancel(record, &CancellationToken::new())
            .await
        {
            Ok(result) => result,
            // a fresh token is never cancelled
            Err(err) => {
                let mut result = ValidationResult::start();
                result.constellation_status = ConstellationStatus::Unknown;
                result.warnings.push(err.to_string());
                result
            }
        }
    }

    /// [`validate_tamper_proof`](Self::validate_tamper_proof), stoppable
    /// between ledger endpoint attempts.
    ///
    /// The only error is [`NetError::Cancelled`].
    pub async fn validate_tamper_proof_with_cancel(
        &self,
        record: &LocalRecord,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult, NetError> {
        let mut result = ValidationResult::start();

        let Some(hash) = record.verifiable_hash() else {
            result.fail(format!(
                "record {} has no fingerprint or ledger transaction hash",
                record.id
            ));
            info!(record = %record.id, "validation stopped at basic level");
            return Ok(result);
        };

        match self.ledger.check_hash(hash, cancel).await {
            Ok(true) => {
                result.level = ValidationLevel::Constellation;
                result.constellation_status = ConstellationStatus::Verified;
                result.last_verified = Some(Utc::now());
            }
            Ok(false) => {
                result.constellation_status = ConstellationStatus::Failed;
                result.fail(format!("hash {hash} was not found on the ledger"));
                info!(record = %record.id, hash, "hash not found on ledger");
                return Ok(result);
            }
            Err(NetError::Cancelled) => return Err(NetError::Cancelled),
            Err(err) => {
                warn!(record = %record.id, hash, reason = %err, "ledger status unknown");
                result.constellation_status = ConstellationStatus::Unknown;
                result
                    .warnings
                    .push(format!("could not reach the ledger to check hash {hash}: {err}"));
                return Ok(result);
            }
        }

        match self.ledger.fetch_logged_data(hash, cancel).await {
            Ok(Some(payload)) => self.compare_logged(record, payload, &mut result),
            Ok(None) => result
                .warnings
                .push("logged data is unavailable; full comparison skipped".to_string()),
            Err(NetError::Cancelled) => return Err(NetError::Cancelled),
            Err(err) => result
                .warnings
                .push(format!("logged data could not be retrieved: {err}")),
        }

        info!(
            record = %record.id,
            level = ?result.level,
            valid = result.is_valid,
            "tamper-proof validation finished"
        );
        Ok(result)
    }

    fn compare_logged(&self, record: &LocalRecord, payload: Value, result: &mut ValidationResult) {
        let logged: LoggedRecord = match serde_json::from_value(payload) {
            Ok(logged) => logged,
            Err(err) => {
                result.fail(format!("logged data is malformed: {err}"));
                return;
            }
        };

        match compare_records(record, &logged) {
            Ok(()) => result.level = ValidationLevel::Full,
            Err(mismatch) => {
                warn!(record = %record.id, %mismatch, "record differs from logged data");
                result.is_valid = false;
                result
                    .errors
                    .extend(mismatch.mismatches.iter().map(ToString::to_string));
            }
        }
    }
}

/// Numeric equality: `100`, `100.0` and `"100"` are the same amount.
fn same_amount(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    a.as_f64() == b.as_f64()
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(Number),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => serde_json::from_str::<Number>(s.trim())
            .map_err(|_| de::Error::custom(format!("amount is not a number: {s:?}"))),
    }
}
