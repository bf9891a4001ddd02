//! Golden test vectors for deterministic verification.
//!
//! Every implementation of the signing pipeline must produce identical
//! canonical JSON, fingerprint hash, signing digest and public key for these
//! inputs.

use evidence_kernel_core::{
    sha256_hex, sign_fingerprint, signing_digest, FingerprintBuilder, FingerprintValue, Result,
    SigningKeypair,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub org_id: &'static str,
    pub tenant_id: &'static str,
    pub event_id: &'static str,
    pub document_id: &'static str,
    pub document_ref: &'static str,
    pub timestamp: &'static str,
    pub version: u32,
    pub signer_id: Option<&'static str>,
    /// Private key bytes used to sign.
    pub key: [u8; 32],
    pub expected_canonical: &'static str,
    /// SHA-256 of the canonical JSON (hex).
    pub expected_hash: &'static str,
    /// First 32 bytes of SHA-512 over the hash text (hex).
    pub expected_digest: &'static str,
    /// Uncompressed public key of `key` (hex).
    pub expected_public_key: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "minimal fingerprint",
            org_id: "org1",
            tenant_id: "t1",
            event_id: "e1",
            document_id: "doc1",
            document_ref: "abc123",
            timestamp: "2024-01-01T00:00:00.000Z",
            version: 1,
            signer_id: None,
            key: [0x42; 32],
            expected_canonical: r#"{"documentId":"doc1","documentRef":"abc123","eventId":"e1","orgId":"org1","tenantId":"t1","timestamp":"2024-01-01T00:00:00.000Z","version":1}"#,
            expected_hash: "d54788c0677f57e0f7d702d0ede781e93ec867d3b76eb78b0dacdfe2c98658f1",
            expected_digest: "fb3b31663daa6cffa1c71f137851be4b54387be61bcc4dad496c3df10477a7ef",
            expected_public_key: "0424653eac434488002cc06bbfb7f10fe18991e35f9fe4302dbea6d2353dc0ab1c119fc5009a032aa9fe47f5e149bb8442f71f884ccb516590686d8ff6ab91c613",
        },
        GoldenVector {
            name: "signer id and version",
            org_id: "acme",
            tenant_id: "eu-1",
            event_id: "evt-0002",
            document_id: "contract-9",
            document_ref: "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
            timestamp: "2024-06-30T23:59:59.999Z",
            version: 2,
            signer_id: Some("alice"),
            key: [0x01; 32],
            expected_canonical: r#"{"documentId":"contract-9","documentRef":"9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08","eventId":"evt-0002","orgId":"acme","signerId":"alice","tenantId":"eu-1","timestamp":"2024-06-30T23:59:59.999Z","version":2}"#,
            expected_hash: "f41f306c1c676f45896e9d25060c9908e8348288a89321f6301650164c9ab706",
            expected_digest: "efc4ef4625d70fee8b53a70e2b8ef90e1a54748eef0482d855ac244b4676c9e1",
            expected_public_key: "041b84c5567b126440995d3ed5aaba0565d71e1834604819ff9c17f5e9d5dd078f70beaf8f588b541507fed6a642c5ab42dfdf8120a7f639de5122d47a69a8e8d1",
        },
        GoldenVector {
            name: "non-ascii values",
            org_id: "Örg",
            tenant_id: "t",
            event_id: "3f1c2a9e-8d4b-4c1a-9a77-2b5e0c6d1f00",
            document_id: "Angebot №5",
            document_ref: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            timestamp: "2025-02-28T12:30:45.123Z",
            version: 10,
            signer_id: None,
            key: [0x07; 32],
            expected_canonical: r#"{"documentId":"Angebot №5","documentRef":"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855","eventId":"3f1c2a9e-8d4b-4c1a-9a77-2b5e0c6d1f00","orgId":"Örg","tenantId":"t","timestamp":"2025-02-28T12:30:45.123Z","version":10}"#,
            expected_hash: "0a0592ae1b4b1868bcda65eaad038ad6d5068d14938766b4aa2f4b0400bb28b2",
            expected_digest: "70a23005d80a0229b364d364048b3f2aa59f5b3c166864353dc183c7377ffba4",
            expected_public_key: "04989c0b76cb563971fdc9bef31ec06c3560f3249d6ee9e5d83c57625596e05f6f631f4d05b3ae518776ee08755a7703e64b2ebc32547504de0b55a142d4ecdf80",
        },
    ]
}

/// Build the fingerprint value described by a vector.
pub fn fingerprint_from_vector(vector: &GoldenVector) -> Result<FingerprintValue> {
    let mut builder = FingerprintBuilder::new(
        vector.org_id,
        vector.tenant_id,
        vector.document_id,
        vector.document_ref,
    )
    .event_id(vector.event_id)
    .timestamp(vector.timestamp)
    .version(vector.version);
    if let Some(signer) = vector.signer_id {
        builder = builder.signer_id(signer);
    }
    builder.build()
}

/// Check every vector end to end, including a signature round-trip.
///
/// Returns the names of vectors that failed and why.
pub fn verify_all_vectors() -> Vec<(String, String)> {
    let mut failures = Vec::new();
    for vector in all_vectors() {
        if let Err(reason) = verify_vector(&vector) {
            failures.push((vector.name.to_string(), reason));
        }
    }
    failures
}

fn verify_vector(vector: &GoldenVector) -> std::result::Result<(), String> {
    let value = fingerprint_from_vector(vector).map_err(|e| e.to_string())?;

    let canonical = value.canonical_json().map_err(|e| e.to_string())?;
    if canonical != vector.expected_canonical {
        return Err(format!("canonical mismatch: {canonical}"));
    }

    let hash = sha256_hex(canonical.as_bytes());
    if hash != vector.expected_hash {
        return Err(format!("hash mismatch: {hash}"));
    }

    let digest = hex::encode(signing_digest(&hash));
    if digest != vector.expected_digest {
        return Err(format!("digest mismatch: {digest}"));
    }

    let keypair = SigningKeypair::from_bytes(&vector.key).map_err(|e| e.to_string())?;
    let public_key = keypair.public_key().to_hex();
    if public_key != vector.expected_public_key {
        return Err(format!("public key mismatch: {public_key}"));
    }

    let signed = sign_fingerprint(&value, &keypair).map_err(|e| e.to_string())?;
    signed.verify().map_err(|e| format!("signature does not verify: {e}"))?;
    if signed.proofs[0].id != vector.expected_public_key {
        return Err("proof id is not the public key".into());
    }
    Ok(())
}
