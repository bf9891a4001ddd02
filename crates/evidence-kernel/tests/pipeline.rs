//! End-to-end attestation pipeline over scripted endpoints.
//!
//! sign -> submit -> publish -> validate, with the network replaced by
//! `ScriptedTransport` so every request can be asserted.

use std::sync::Arc;

use anyhow::Result;
use proptest::prelude::*;
use serde_json::Value;

use evidence_kernel::net::transport::memory::{Reply, ScriptedTransport};
use evidence_kernel::net::{LedgerClient, Method};
use evidence_kernel::{
    Attestor, CancellationToken, ConstellationStatus, KernelConfig, LocalRecord, LoggedRecord,
    Network, TamperProofValidator, ValidationLevel,
};
use evidence_kernel_testkit::fixtures::{
    accepting_attestation_api, accepting_ledger, keypair, ledger_with_record, sample_fingerprint,
    sample_record, unreachable_endpoint,
};
use evidence_kernel_testkit::generators::record_payload;

const API: &str = "https://api.test/v1";
const EXPLORER: &str = "https://explorer.test";

/// Route `tracing` output through the test harness so per-endpoint failure
/// reasons show up next to a failing assertion.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn config() -> KernelConfig {
    let mut config = KernelConfig::for_network(Network::Integrationnet)
        .with_api_key("test-key")
        .with_ledger_endpoints(vec!["https://l0".to_string(), "https://l1".to_string()])
        .with_validation_endpoints(vec![
            "https://v0".to_string(),
            "https://v1".to_string(),
            "https://v2".to_string(),
        ]);
    config.attestation_base_url = API.to_string();
    config.explorer_base_url = EXPLORER.to_string();
    config
}

fn local_record(payload: &Value, ledger_tx_hash: &str) -> Result<LocalRecord> {
    let mut record: LocalRecord = serde_json::from_value(payload.clone())?;
    record.ledger_tx_hash = Some(ledger_tx_hash.to_string());
    Ok(record)
}

#[tokio::test]
async fn attest_publish_and_fully_validate() -> Result<()> {
    init_tracing();
    let payload = sample_record("escrow-1");
    let transport = accepting_attestation_api(ScriptedTransport::new(), API, "e1");
    let transport = unreachable_endpoint(transport, "https://l0", &["/cluster/info"]);
    let transport = accepting_ledger(transport, "https://l1", "tx-777");
    let transport = ledger_with_record(transport, "https://v0", "tx-777", &payload);
    let transport = Arc::new(transport);

    let attestor = Attestor::with_transport(config(), transport.clone());

    let attestation = attestor
        .attest(&sample_fingerprint()?, &keypair(0x42)?)
        .await?;
    assert_eq!(
        attestation.explorer_url,
        format!("{EXPLORER}/fingerprint/{}", attestation.hash)
    );
    attestation.signed.verify()?;

    let published = attestor.publish(&payload).await?;
    assert_eq!(published.endpoint, "https://l1");
    assert_eq!(published.tx_hash, "tx-777");

    let result = attestor
        .validate_tamper_proof(&local_record(&payload, &published.tx_hash)?)
        .await;
    assert!(result.is_valid, "{:?}", result.errors);
    assert_eq!(result.level, ValidationLevel::Full);
    assert_eq!(result.constellation_status, ConstellationStatus::Verified);

    let calls = transport.calls().await;
    assert_eq!(
        calls,
        vec![
            (Method::Post, format!("{API}/fingerprints")),
            (Method::Get, "https://l0/cluster/info".to_string()),
            (Method::Get, "https://l1/cluster/info".to_string()),
            (Method::Post, "https://l1/transaction".to_string()),
            (Method::Get, "https://v0/transaction/tx-777".to_string()),
            (Method::Get, "https://v0/transaction/tx-777".to_string()),
        ]
    );

    let submitted = &transport.requests().await[0];
    assert!(submitted
        .headers
        .contains(&("X-API-KEY".to_string(), "test-key".to_string())));
    Ok(())
}

#[tokio::test]
async fn tampered_amount_is_caught_at_full_level() -> Result<()> {
    init_tracing();
    let published = sample_record("escrow-2");
    let mut local = published.clone();
    local["participants"][0]["amount"] = Value::from(1600);

    let transport = ledger_with_record(ScriptedTransport::new(), "https://v0", "tx-2", &published);
    let attestor = Attestor::with_transport(config(), transport);

    let result = attestor
        .validate_tamper_proof(&local_record(&local, "tx-2")?)
        .await;
    assert!(!result.is_valid);
    assert_eq!(result.level, ValidationLevel::Constellation);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("participants[0].amount"));
    Ok(())
}

#[tokio::test]
async fn unreachable_ledger_leaves_status_unknown() -> Result<()> {
    init_tracing();
    let mut transport = ScriptedTransport::new();
    for endpoint in ["https://v0", "https://v1", "https://v2"] {
        transport = unreachable_endpoint(transport, endpoint, &["/transaction/tx-3"]);
    }
    let attestor = Attestor::with_transport(config(), transport);

    let result = attestor
        .validate_tamper_proof(&local_record(&sample_record("escrow-3"), "tx-3")?)
        .await;
    assert!(result.is_valid);
    assert_eq!(result.level, ValidationLevel::Basic);
    assert_eq!(result.constellation_status, ConstellationStatus::Unknown);
    assert!(!result.warnings.is_empty());
    Ok(())
}

#[tokio::test]
async fn rate_limited_ledger_is_unknown_not_failed() -> Result<()> {
    init_tracing();
    let transport = ScriptedTransport::new()
        .on_get("https://v0/transaction/tx-4", Reply::status(429))
        .on_get("https://v1/transaction/tx-4", Reply::status(429))
        .on_get("https://v2/transaction/tx-4", Reply::status(408));
    let attestor = Attestor::with_transport(config(), transport);

    let result = attestor
        .validate_tamper_proof(&local_record(&sample_record("escrow-4"), "tx-4")?)
        .await;
    assert!(result.is_valid, "{:?}", result.errors);
    assert_eq!(result.constellation_status, ConstellationStatus::Unknown);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    Ok(())
}

#[tokio::test]
async fn cancelled_validation_is_an_error_not_a_result() -> Result<()> {
    init_tracing();
    let attestor = Attestor::with_transport(config(), ScriptedTransport::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = attestor
        .validate_tamper_proof_with_cancel(&local_record(&sample_record("r"), "tx")?, &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn submit_without_api_key_is_configuration_error() -> Result<()> {
    init_tracing();
    let mut config = config();
    config.api_key = None;
    let transport = Arc::new(ScriptedTransport::new());
    let attestor = Attestor::with_transport(config, transport.clone());

    let signed = attestor.sign(&sample_fingerprint()?, &keypair(1)?)?;
    assert!(attestor.submit(&signed, None).await.is_err());
    assert!(transport.calls().await.is_empty());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_logged_record_matching_local_reaches_full(payload in record_payload()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let transport = ledger_with_record(ScriptedTransport::new(), "https://v0", "tx", &payload);
        let validator = TamperProofValidator::new(LedgerClient::new(
            transport,
            vec![],
            vec!["https://v0".to_string()],
        ));
        let record = local_record(&payload, "tx").unwrap();

        let result = runtime.block_on(validator.validate_tamper_proof(&record));
        prop_assert!(result.is_valid);
        prop_assert_eq!(result.level, ValidationLevel::Full);

        let logged: LoggedRecord = serde_json::from_value(payload).unwrap();
        prop_assert_eq!(logged, LoggedRecord::from(&record));
    }
}
