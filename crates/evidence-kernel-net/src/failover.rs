//! First-success-wins failover over an ordered endpoint list.
//!
//! Attempts are strictly sequential. The first endpoint whose attempt returns
//! `Ok` wins and no later endpoint is contacted. Cancellation is observed
//! before each attempt, never in the middle of one.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{EndpointFailure, NetError, Result};

/// The winning endpoint and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T> {
    pub endpoint: String,
    pub value: T,
}

/// Run `attempt` against each endpoint in order until one succeeds.
///
/// Every failure is recorded. If all endpoints fail the result is
/// [`NetError::AllEndpointsFailed`] carrying each reason in order. A
/// cancelled token yields [`NetError::Cancelled`] regardless of how many
/// attempts already failed.
pub async fn first_success<T, F, Fut>(
    operation: &str,
    endpoints: &[String],
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<Success<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut failures = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        if cancel.is_cancelled() {
            debug!(operation, attempted = failures.len(), "cancelled before next endpoint");
            return Err(NetError::Cancelled);
        }

        debug!(operation, endpoint = %endpoint, "trying endpoint");
        match attempt(endpoint.clone()).await {
            Ok(value) => {
                return Ok(Success {
                    endpoint: endpoint.clone(),
                    value,
                })
            }
            Err(NetError::Cancelled) => return Err(NetError::Cancelled),
            Err(err) => {
                warn!(operation, endpoint = %endpoint, reason = %err, "endpoint failed");
                failures.push(EndpointFailure {
                    endpoint: endpoint.clone(),
                    reason: err.to_string(),
                    unreachable: err.is_unreachable(),
                    definite: err.is_definite(),
                });
            }
        }
    }

    Err(NetError::AllEndpointsFailed { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn endpoints(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let result = first_success(
            "test",
            &endpoints(&["a", "b", "c", "d"]),
            &CancellationToken::new(),
            |endpoint| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(endpoint.clone());
                    match endpoint.as_str() {
                        "c" => Ok(42),
                        _ => Err(NetError::Network("refused".into())),
                    }
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.endpoint, "c");
        assert_eq!(result.value, 42);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_exhaustion_keeps_every_reason() {
        let err = first_success::<(), _, _>(
            "test",
            &endpoints(&["a", "b"]),
            &CancellationToken::new(),
            |endpoint| async move {
                if endpoint == "a" {
                    Err(NetError::Timeout("10s".into()))
                } else {
                    Err(NetError::Parse("no hash".into()))
                }
            },
        )
        .await
        .unwrap_err();

        let failures = err.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].unreachable);
        assert!(!failures[1].unreachable);
        assert!(failures[1].definite);
        assert!(err.to_string().contains("a: timeout: 10s; b: malformed response: no hash"));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut attempts = 0;
        let err = first_success::<(), _, _>("test", &endpoints(&["a"]), &cancel, |_| {
            attempts += 1;
            async { Ok(()) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, NetError::Cancelled));
        assert_eq!(attempts, 0);
    }

    #[tokio::test]
    async fn test_cancelled_between_attempts() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();

        let err = first_success::<(), _, _>(
            "test",
            &endpoints(&["a", "b", "c"]),
            &cancel,
            move |_| {
                let trigger = trigger.clone();
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                    trigger.cancel();
                    Err(NetError::Network("down".into()))
                }
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, NetError::Cancelled));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_list_is_exhausted() {
        let err = first_success::<(), _, _>("test", &[], &CancellationToken::new(), |_| async {
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            NetError::AllEndpointsFailed { ref failures } if failures.is_empty()
        ));
    }
}
