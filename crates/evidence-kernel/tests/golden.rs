//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of the Evidence Kernel must produce identical:
//! - canonical JSON
//! - fingerprint hash (SHA-256 of the canonical JSON, hex)
//! - signing digest (first 32 bytes of SHA-512 over the hash text)
//! - public key (uncompressed secp256k1, hex)
//!
//! Signatures are deterministic (RFC 6979) but only checked by verification.

use evidence_kernel::core::{
    canonicalize_value, sha256_hex, sign_fingerprint, signing_digest, verify_signed_fingerprint,
};
use evidence_kernel::net::transport::memory::ScriptedTransport;
use evidence_kernel::{Attestor, KernelConfig};
use evidence_kernel_testkit::generators::{fingerprint_value, json_value, keypair};
use evidence_kernel_testkit::{all_vectors, fingerprint_from_vector, verify_all_vectors};
use proptest::prelude::*;
use serde_json::{json, Value};

#[test]
fn testkit_vectors_pass() {
    assert_eq!(verify_all_vectors(), Vec::<(String, String)>::new());
}

#[test]
fn attestor_reproduces_every_vector() {
    let attestor = Attestor::with_transport(KernelConfig::default(), ScriptedTransport::new());

    for vector in all_vectors() {
        let value = fingerprint_from_vector(&vector).unwrap();
        let hash = attestor.fingerprint_hash(&value).unwrap();
        assert_eq!(hash.to_hex(), vector.expected_hash, "{}", vector.name);

        let signed = attestor
            .sign_with_hex_key(&value, &hex::encode(vector.key))
            .unwrap();
        assert_eq!(signed.proofs[0].id, vector.expected_public_key, "{}", vector.name);
        verify_signed_fingerprint(&signed).unwrap();

        assert!(attestor.explorer_url(&hash).ends_with(vector.expected_hash));
    }
}

#[test]
fn signing_digest_hashes_the_hex_text() {
    // SHA-256("") then SHA-512 over its 64 hex characters, not its 32 bytes
    let empty = sha256_hex(b"");
    assert_eq!(
        empty,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        hex::encode(signing_digest(&empty)),
        "2f6c5d2f6d5a5011f9f498476cf424b57b6ad5f90cf225c03525de77b78ed45e"
    );
}

#[test]
fn canonical_json_orders_keys_and_strips_whitespace() {
    let value = json!({
        "version": 1,
        "timestamp": "2024-01-01T00:00:00.000Z",
        "tenantId": "t1",
        "orgId": "org1",
        "eventId": "e1",
        "documentRef": "abc123",
        "documentId": "doc1"
    });
    assert_eq!(
        canonicalize_value(&value).unwrap(),
        all_vectors()[0].expected_canonical
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn canonical_form_is_a_fixed_point(value in json_value()) {
        let once = canonicalize_value(&value).unwrap();
        let reparsed: Value = serde_json::from_str(&once).unwrap();
        prop_assert_eq!(canonicalize_value(&reparsed).unwrap(), once);
    }

    #[test]
    fn any_key_signs_any_fingerprint(signer in keypair(), value in fingerprint_value()) {
        let signed = sign_fingerprint(&value, &signer).unwrap();
        prop_assert_eq!(&signed.proofs[0].id, &signer.public_key().to_hex());
        prop_assert!(verify_signed_fingerprint(&signed).is_ok());
    }
}
