//! Transport abstraction for ledger and attestation HTTP calls.
//!
//! The transport layer only moves requests and responses. A non-2xx status is
//! a normal [`HttpResponse`]; only failures to obtain a response at all
//! (connection, timeout) are errors. Implementations must enforce their own
//! per-request timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NetError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`NetError::Http`] unless the status is 2xx.
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(NetError::Http {
                status: self.status,
                url: url.to_string(),
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| NetError::Parse(e.to_string()))
    }
}

/// Transport trait for sending HTTP requests.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return whatever the server answered.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose every request carries `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(&request.url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify(&request.url, e))?;

        Ok(HttpResponse { status, body })
    }
}

fn classify(url: &str, err: reqwest::Error) -> NetError {
    if err.is_timeout() {
        NetError::Timeout(format!("{url}: {err}"))
    } else {
        NetError::Network(format!("{url}: {err}"))
    }
}

/// A scripted in-memory transport for testing.
///
/// Replies are matched on exact method and URL; unmatched requests get a 404.
/// Every request is recorded in arrival order.
pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    /// What the transport does for a matched request.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Respond { status: u16, body: String },
        Unreachable(String),
        Timeout,
    }

    impl Reply {
        pub fn status(status: u16) -> Self {
            Reply::Respond {
                status,
                body: String::new(),
            }
        }

        pub fn json(status: u16, body: Value) -> Self {
            Reply::Respond {
                status,
                body: body.to_string(),
            }
        }

        pub fn text(status: u16, body: impl Into<String>) -> Self {
            Reply::Respond {
                status,
                body: body.into(),
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Route {
        method: Method,
        url: String,
        reply: Reply,
    }

    /// In-memory transport implementation.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        routes: Vec<Route>,
        calls: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script a reply. Later routes for the same request are ignored.
        pub fn route(mut self, method: Method, url: impl Into<String>, reply: Reply) -> Self {
            self.routes.push(Route {
                method,
                url: url.into(),
                reply,
            });
            self
        }

        pub fn on_get(self, url: impl Into<String>, reply: Reply) -> Self {
            self.route(Method::Get, url, reply)
        }

        pub fn on_post(self, url: impl Into<String>, reply: Reply) -> Self {
            self.route(Method::Post, url, reply)
        }

        /// All requests received so far.
        pub async fn requests(&self) -> Vec<HttpRequest> {
            self.calls.lock().await.clone()
        }

        /// `(method, url)` of every request received so far.
        pub async fn calls(&self) -> Vec<(Method, String)> {
            self.calls
                .lock()
                .await
                .iter()
                .map(|r| (r.method, r.url.clone()))
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            let reply = self
                .routes
                .iter()
                .find(|r| r.method == request.method && r.url == request.url)
                .map(|r| r.reply.clone());
            let url = request.url.clone();
            self.calls.lock().await.push(request);

            match reply {
                Some(Reply::Respond { status, body }) => Ok(HttpResponse { status, body }),
                Some(Reply::Unreachable(reason)) => {
                    Err(NetError::Network(format!("{url}: {reason}")))
                }
                Some(Reply::Timeout) => Err(NetError::Timeout(format!("{url}: deadline elapsed"))),
                None => Ok(HttpResponse {
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }
}
