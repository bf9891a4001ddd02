//! Ledger publication, hash validation and payload retrieval.
//!
//! All three operations go through [`first_success`], so each one tries its
//! endpoint list in order and stops at the first usable answer.
//!
//! | Operation | Endpoints | Requests per endpoint |
//! |---|---|---|
//! | [`LedgerClient::publish`] | ledger list | `GET /cluster/info`, `POST /transaction` |
//! | [`LedgerClient::validate_hash`] | validation list | `GET /transaction/{hash}` |
//! | [`LedgerClient::logged_data`] | first two of validation list | `GET /transaction/{hash}` |

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::endpoints::{normalize_endpoints, Network};
use crate::error::{NetError, Result};
use crate::failover::first_success;
use crate::messages::TxRecord;
use crate::transport::{HttpRequest, Transport};

/// How many validation endpoints are asked for logged data.
pub const LOGGED_DATA_ENDPOINTS: usize = 2;

/// A successful publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Endpoint that accepted the write.
    pub endpoint: String,
    /// Transaction hash it reported.
    pub tx_hash: String,
}

/// Read-side ledger access.
///
/// This is the seam the tamper-proof validator depends on, so it can be
/// exercised without HTTP.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// See [`LedgerClient::validate_hash_with_cancel`].
    async fn check_hash(&self, hash: &str, cancel: &CancellationToken) -> Result<bool>;

    /// See [`LedgerClient::logged_data_with_cancel`].
    async fn fetch_logged_data(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>>;
}

/// Client for the ledger network's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct LedgerClient<T: Transport> {
    transport: T,
    ledger_endpoints: Vec<String>,
    validation_endpoints: Vec<String>,
}

impl<T: Transport> LedgerClient<T> {
    /// Create a client over explicit endpoint lists. URLs are normalized.
    pub fn new(
        transport: T,
        ledger_endpoints: impl IntoIterator<Item = String>,
        validation_endpoints: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            transport,
            ledger_endpoints: normalize_endpoints(ledger_endpoints),
            validation_endpoints: normalize_endpoints(validation_endpoints),
        }
    }

    /// Create a client using a network's default endpoint tables.
    pub fn for_network(transport: T, network: Network) -> Self {
        Self::new(
            transport,
            network.ledger_endpoints(),
            network.validation_endpoints(),
        )
    }

    pub fn ledger_endpoints(&self) -> &[String] {
        &self.ledger_endpoints
    }

    pub fn validation_endpoints(&self) -> &[String] {
        &self.validation_endpoints
    }

    /// Publish `payload` to the first healthy endpoint that accepts it.
    pub async fn publish(&self, payload: &Value) -> Result<Published> {
        self.publish_with_cancel(payload, &CancellationToken::new())
            .await
    }

    /// [`publish`](Self::publish), stoppable between endpoint attempts.
    ///
    /// At most one successful write is made per call.
    pub async fn publish_with_cancel(
        &self,
        payload: &Value,
        cancel: &CancellationToken,
    ) -> Result<Published> {
        let this = self;
        let success = first_success("publish", &self.ledger_endpoints, cancel, move |endpoint| {
            this.publish_to(endpoint, payload)
        })
        .await?;

        info!(endpoint = %success.endpoint, tx_hash = %success.value, "payload published");
        Ok(Published {
            endpoint: success.endpoint,
            tx_hash: success.value,
        })
    }

    async fn publish_to(&self, endpoint: String, payload: &Value) -> Result<String> {
        let health_url = format!("{endpoint}/cluster/info");
        self.transport
            .send(HttpRequest::get(&health_url))
            .await?
            .error_for_status(&health_url)?;

        let tx_url = format!("{endpoint}/transaction");
        let response = self
            .transport
            .send(HttpRequest::post_json(&tx_url, payload.clone()))
            .await?
            .error_for_status(&tx_url)?;
        let record = TxRecord::from_json(&response.json()?)?;
        Ok(record.primary_hash().to_string())
    }

    /// Whether the ledger knows a transaction with this hash.
    pub async fn validate_hash(&self, hash: &str) -> Result<bool> {
        self.validate_hash_with_cancel(hash, &CancellationToken::new())
            .await
    }

    /// [`validate_hash`](Self::validate_hash), stoppable between endpoint
    /// attempts.
    ///
    /// `Ok(true)` as soon as one endpoint returns a record whose `txId` or
    /// `hash` equals `hash`. `Ok(false)` when every endpoint was tried and at
    /// least one gave a definite answer without a match: a 404, or a 2xx whose
    /// record is unusable or names another transaction. When no endpoint gave
    /// such an answer (unreachable, rate limited, 5xx, other refusals) the
    /// status is unknown and the exhausted failover error is returned.
    pub async fn validate_hash_with_cancel(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        if hash.trim().is_empty() {
            return Ok(false);
        }

        let this = self;
        let outcome = first_success(
            "validate_hash",
            &self.validation_endpoints,
            cancel,
            move |endpoint| this.confirm_hash(endpoint, hash),
        )
        .await;

        match outcome {
            Ok(success) => {
                info!(endpoint = %success.endpoint, hash, "hash confirmed on ledger");
                Ok(true)
            }
            Err(NetError::AllEndpointsFailed { failures })
                if failures.iter().any(|f| f.definite) =>
            {
                info!(hash, "hash not found on any endpoint");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    async fn confirm_hash(&self, endpoint: String, hash: &str) -> Result<()> {
        let record = self.fetch_record(&endpoint, hash).await?;
        if record.matches(hash) {
            Ok(())
        } else {
            Err(NetError::NotFound(format!(
                "{endpoint} returned transaction {}",
                record.primary_hash()
            )))
        }
    }

    /// The payload logged with a transaction, if any.
    pub async fn logged_data(&self, hash: &str) -> Result<Option<Value>> {
        self.logged_data_with_cancel(hash, &CancellationToken::new())
            .await
    }

    /// [`logged_data`](Self::logged_data), stoppable between endpoint
    /// attempts.
    ///
    /// Only the first [`LOGGED_DATA_ENDPOINTS`] validation endpoints are
    /// asked. Failures are logged and folded into `Ok(None)`; the only error
    /// is [`NetError::Cancelled`].
    pub async fn logged_data_with_cancel(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        let limit = self.validation_endpoints.len().min(LOGGED_DATA_ENDPOINTS);
        let this = self;
        let outcome = first_success(
            "logged_data",
            &self.validation_endpoints[..limit],
            cancel,
            move |endpoint| this.fetch_payload(endpoint, hash),
        )
        .await;

        match outcome {
            Ok(success) => Ok(Some(success.value)),
            Err(NetError::Cancelled) => Err(NetError::Cancelled),
            Err(err) => {
                warn!(hash, reason = %err, "no logged data available");
                Ok(None)
            }
        }
    }

    async fn fetch_payload(&self, endpoint: String, hash: &str) -> Result<Value> {
        let record = self.fetch_record(&endpoint, hash).await?;
        record
            .logged_payload()?
            .ok_or_else(|| NetError::NotFound(format!("{endpoint}: transaction has no details")))
    }

    async fn fetch_record(&self, endpoint: &str, hash: &str) -> Result<TxRecord> {
        let url = format!("{endpoint}/transaction/{hash}");
        let response = self.transport.send(HttpRequest::get(&url)).await?;
        if response.status == 404 {
            return Err(NetError::NotFound(url));
        }
        let response = response.error_for_status(&url)?;
        TxRecord::from_json(&response.json()?)
    }
}

#[async_trait]
impl<T: Transport> LedgerReader for LedgerClient<T> {
    async fn check_hash(&self, hash: &str, cancel: &CancellationToken) -> Result<bool> {
        self.validate_hash_with_cancel(hash, cancel).await
    }

    async fn fetch_logged_data(
        &self,
        hash: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        self.logged_data_with_cancel(hash, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{Reply, ScriptedTransport};
    use crate::transport::Method;
    use serde_json::json;

    fn client(transport: ScriptedTransport) -> LedgerClient<ScriptedTransport> {
        LedgerClient::new(
            transport,
            vec!["https://l0".to_string(), "https://l1/".to_string()],
            vec![
                "https://v0".to_string(),
                "https://v1".to_string(),
                "https://v2".to_string(),
            ],
        )
    }

    #[tokio::test]
    async fn test_publish_first_healthy_endpoint() {
        let transport = ScriptedTransport::new()
            .on_get("https://l0/cluster/info", Reply::status(200))
            .on_post("https://l0/transaction", Reply::json(200, json!({"txId": "tx-1"})));
        let ledger = client(transport);

        let published = ledger.publish(&json!({"k": "v"})).await.unwrap();
        assert_eq!(published.endpoint, "https://l0");
        assert_eq!(published.tx_hash, "tx-1");

        let requests = ledger.transport.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].body, Some(json!({"k": "v"})));
    }

    #[tokio::test]
    async fn test_publish_rejects_response_without_identifier() {
        let transport = ScriptedTransport::new()
            .on_get("https://l0/cluster/info", Reply::status(200))
            .on_post("https://l0/transaction", Reply::json(200, json!({"ok": true})))
            .on_get("https://l1/cluster/info", Reply::status(200))
            .on_post("https://l1/transaction", Reply::json(200, json!({"hash": "h-2"})));
        let ledger = client(transport);

        let published = ledger.publish(&json!({})).await.unwrap();
        assert_eq!(published.endpoint, "https://l1");
        assert_eq!(published.tx_hash, "h-2");
    }

    #[tokio::test]
    async fn test_validate_hash_matches_either_field() {
        let transport = ScriptedTransport::new()
            .on_get("https://v0/transaction/abc", Reply::status(503))
            .on_get(
                "https://v1/transaction/abc",
                Reply::json(200, json!({"txId": "other", "hash": "abc"})),
            );
        let ledger = client(transport);

        assert!(ledger.validate_hash("abc").await.unwrap());
        assert_eq!(ledger.transport.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_validate_hash_not_found_is_false() {
        // unscripted routes answer 404
        let ledger = client(ScriptedTransport::new());
        assert!(!ledger.validate_hash("missing").await.unwrap());
        assert_eq!(ledger.transport.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_validate_hash_mismatch_is_false() {
        let transport = ScriptedTransport::new().on_get(
            "https://v0/transaction/abc",
            Reply::json(200, json!({"hash": "abd"})),
        );
        assert!(!client(transport).validate_hash("abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_hash_all_unreachable_is_error() {
        let transport = ScriptedTransport::new()
            .on_get("https://v0/transaction/abc", Reply::Timeout)
            .on_get("https://v1/transaction/abc", Reply::Unreachable("refused".into()))
            .on_get("https://v2/transaction/abc", Reply::status(500));
        let err = client(transport).validate_hash("abc").await.unwrap_err();
        assert_eq!(err.failures().len(), 3);
    }

    #[tokio::test]
    async fn test_validate_hash_rate_limited_is_error() {
        let transport = ScriptedTransport::new()
            .on_get("https://v0/transaction/abc", Reply::status(429))
            .on_get("https://v1/transaction/abc", Reply::status(408))
            .on_get("https://v2/transaction/abc", Reply::status(403));
        let err = client(transport).validate_hash("abc").await.unwrap_err();
        assert!(err.failures().iter().all(|f| !f.definite));
    }

    #[tokio::test]
    async fn test_one_not_found_among_outages_is_false() {
        let transport = ScriptedTransport::new()
            .on_get("https://v0/transaction/abc", Reply::status(429))
            .on_get("https://v1/transaction/abc", Reply::Timeout);
        // v2 is unscripted and answers 404
        assert!(!client(transport).validate_hash("abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_hash_is_never_sent() {
        let ledger = client(ScriptedTransport::new());
        assert!(!ledger.validate_hash(" ").await.unwrap());
        assert!(ledger.transport.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_logged_data_uses_first_two_endpoints() {
        let transport = ScriptedTransport::new()
            .on_get("https://v0/transaction/abc", Reply::json(200, json!({"hash": "abc"})))
            .on_get("https://v1/transaction/abc", Reply::Timeout)
            .on_get(
                "https://v2/transaction/abc",
                Reply::json(200, json!({"hash": "abc", "details": "{\"id\":\"r\"}"})),
            );
        let ledger = client(transport);

        assert_eq!(ledger.logged_data("abc").await.unwrap(), None);
        assert_eq!(
            ledger.transport.calls().await,
            vec![
                (Method::Get, "https://v0/transaction/abc".to_string()),
                (Method::Get, "https://v1/transaction/abc".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_logged_data_decodes_details() {
        let transport = ScriptedTransport::new().on_get(
            "https://v0/transaction/abc",
            Reply::json(200, json!({"txId": "abc", "details": "{\"id\":\"r1\",\"title\":\"T\"}"})),
        );
        let data = client(transport).logged_data("abc").await.unwrap().unwrap();
        assert_eq!(data, json!({"id": "r1", "title": "T"}));
    }

    #[tokio::test]
    async fn test_logged_data_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ledger = client(ScriptedTransport::new());
        let err = ledger
            .logged_data_with_cancel("abc", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::Cancelled));
        assert!(ledger.transport.calls().await.is_empty());
    }

    #[test]
    fn test_for_network_uses_default_tables() {
        let ledger = LedgerClient::for_network(ScriptedTransport::new(), Network::Testnet);
        assert_eq!(ledger.validation_endpoints(), Network::Testnet.validation_endpoints());
        assert_eq!(ledger.ledger_endpoints().len(), 2);
    }
}
