//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic keys, sample
//! records, and scripted ledger and attestation endpoints.

use serde_json::{json, Value};

use evidence_kernel_core::{FingerprintBuilder, FingerprintValue, Result, SigningKeypair};
use evidence_kernel_net::transport::memory::{Reply, ScriptedTransport};

/// A deterministic keypair whose scalar is `byte` repeated 32 times.
///
/// `byte` must be non-zero.
pub fn keypair(byte: u8) -> Result<SigningKeypair> {
    SigningKeypair::from_bytes(&[byte; 32])
}

/// The fingerprint of the first golden vector.
pub fn sample_fingerprint() -> Result<FingerprintValue> {
    FingerprintBuilder::new("org1", "t1", "doc1", "abc123")
        .event_id("e1")
        .timestamp("2024-01-01T00:00:00.000Z")
        .build()
}

/// An escrow-like record payload with two participants.
pub fn sample_record(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Website redesign",
        "creator": "alice",
        "participants": [
            {"principal": "bob", "amount": 1500, "percentage": 60.0},
            {"principal": "carol", "amount": 1000, "percentage": 40.0}
        ]
    })
}

/// Add a healthy ledger endpoint that accepts writes with `tx_hash`.
pub fn accepting_ledger(
    transport: ScriptedTransport,
    endpoint: &str,
    tx_hash: &str,
) -> ScriptedTransport {
    transport
        .on_get(format!("{endpoint}/cluster/info"), Reply::status(200))
        .on_post(
            format!("{endpoint}/transaction"),
            Reply::json(200, json!({ "hash": tx_hash })),
        )
}

/// Add an endpoint that knows transaction `tx_hash` and logged `payload`
/// with it.
pub fn ledger_with_record(
    transport: ScriptedTransport,
    endpoint: &str,
    tx_hash: &str,
    payload: &Value,
) -> ScriptedTransport {
    transport.on_get(
        format!("{endpoint}/transaction/{tx_hash}"),
        Reply::json(200, json!({ "txId": tx_hash, "details": payload.to_string() })),
    )
}

/// Add an endpoint whose GET requests on `get_paths` cannot connect.
pub fn unreachable_endpoint(
    mut transport: ScriptedTransport,
    endpoint: &str,
    get_paths: &[&str],
) -> ScriptedTransport {
    for path in get_paths {
        transport = transport.on_get(
            format!("{endpoint}{path}"),
            Reply::Unreachable("connection refused".into()),
        );
    }
    transport
}

/// Add an attestation API that accepts every submission.
pub fn accepting_attestation_api(
    transport: ScriptedTransport,
    base_url: &str,
    event_id: &str,
) -> ScriptedTransport {
    transport.on_post(
        format!("{base_url}/fingerprints"),
        Reply::json(200, json!([{ "eventId": event_id, "accepted": true }])),
    )
}
