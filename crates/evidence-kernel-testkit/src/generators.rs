//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use evidence_kernel_core::{FingerprintBuilder, FingerprintValue, SigningKeypair};

/// Generate a valid secp256k1 keypair.
pub fn keypair() -> impl Strategy<Value = SigningKeypair> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |bytes| {
        SigningKeypair::from_bytes(&bytes).ok()
    })
}

/// Generate a non-empty identifier.
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,24}"
}

/// Generate a lowercase hex content reference.
pub fn document_ref() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}"
}

/// Generate a millisecond-precision UTC timestamp.
pub fn timestamp() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1000).prop_map(
        |(y, mo, d, h, mi, s, ms)| format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{ms:03}Z"),
    )
}

/// Generate a fully specified fingerprint value.
pub fn fingerprint_value() -> impl Strategy<Value = FingerprintValue> {
    (
        identifier(),
        identifier(),
        identifier(),
        identifier(),
        document_ref(),
        timestamp(),
        1u32..1000,
        proptest::option::of(identifier()),
    )
        .prop_filter_map(
            "invalid fingerprint",
            |(org, tenant, event, doc, doc_ref, ts, version, signer)| {
                let mut builder = FingerprintBuilder::new(org, tenant, doc, doc_ref)
                    .event_id(event)
                    .timestamp(ts)
                    .version(version);
                if let Some(signer) = signer {
                    builder = builder.signer_id(signer);
                }
                builder.build().ok()
            },
        )
}

/// Generate arbitrary JSON without floating point numbers.
///
/// Floats are left out because their canonical form is tested separately.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((".{0,8}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a record payload as it is logged on the ledger.
pub fn record_payload() -> impl Strategy<Value = Value> {
    let participant = (identifier(), 0u64..1_000_000, 0u32..=100).prop_map(
        |(principal, amount, percentage)| {
            json!({
                "principal": principal,
                "amount": amount,
                "percentage": f64::from(percentage),
            })
        },
    );
    (
        identifier(),
        ".{1,32}",
        identifier(),
        prop::collection::vec(participant, 1..5),
    )
        .prop_map(|(id, title, creator, participants)| {
            json!({
                "id": id,
                "title": title,
                "creator": creator,
                "participants": participants,
            })
        })
}
