//! Kernel configuration.
//!
//! Resolved once at startup and passed by value into the [`Attestor`]. Nothing
//! reads the environment after construction.
//!
//! [`Attestor`]: crate::Attestor

use std::time::Duration;

use evidence_kernel_net::endpoints::normalize_endpoints;
use evidence_kernel_net::{Network, DEFAULT_TIMEOUT};

use crate::error::{KernelError, Result};

pub const ENV_NETWORK: &str = "EVIDENCE_NETWORK";
pub const ENV_API_KEY: &str = "EVIDENCE_API_KEY";
pub const ENV_API_BASE_URL: &str = "EVIDENCE_API_BASE_URL";
pub const ENV_EXPLORER_URL: &str = "EVIDENCE_EXPLORER_URL";
pub const ENV_LEDGER_ENDPOINTS: &str = "EVIDENCE_LEDGER_ENDPOINTS";
pub const ENV_VALIDATION_ENDPOINTS: &str = "EVIDENCE_VALIDATION_ENDPOINTS";
pub const ENV_TIMEOUT_SECS: &str = "EVIDENCE_TIMEOUT_SECS";

/// Configuration for the Kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Ledger network the endpoint defaults were taken from.
    pub network: Network,
    /// Attestation API key. Only submission needs it.
    pub api_key: Option<String>,
    /// Base URL of the attestation API, without trailing slash.
    pub attestation_base_url: String,
    /// Base URL of the fingerprint explorer, without trailing slash.
    pub explorer_base_url: String,
    /// Endpoints tried in order when publishing.
    pub ledger_endpoints: Vec<String>,
    /// Endpoints tried in order when validating and retrieving.
    pub validation_endpoints: Vec<String>,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

impl KernelConfig {
    /// Defaults for a network, without an API key.
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            api_key: None,
            attestation_base_url: network.attestation_base_url(),
            explorer_base_url: network.explorer_base_url(),
            ledger_endpoints: network.ledger_endpoints(),
            validation_endpoints: network.validation_endpoints(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// The network is resolved first; every other variable overrides one
    /// field of that network's defaults. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let network = match get(ENV_NETWORK) {
            Some(name) => name
                .parse::<Network>()
                .map_err(|e| KernelError::Configuration(e.to_string()))?,
            None => Network::default(),
        };

        let mut config = Self::for_network(network);
        config.api_key = get(ENV_API_KEY);
        if let Some(url) = get(ENV_API_BASE_URL) {
            config.attestation_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get(ENV_EXPLORER_URL) {
            config.explorer_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(list) = get(ENV_LEDGER_ENDPOINTS) {
            config.ledger_endpoints = parse_endpoint_list(ENV_LEDGER_ENDPOINTS, &list)?;
        }
        if let Some(list) = get(ENV_VALIDATION_ENDPOINTS) {
            config.validation_endpoints = parse_endpoint_list(ENV_VALIDATION_ENDPOINTS, &list)?;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                KernelError::Configuration(format!("{ENV_TIMEOUT_SECS} is not a number: {secs:?}"))
            })?;
            if secs == 0 {
                return Err(KernelError::Configuration(format!(
                    "{ENV_TIMEOUT_SECS} must be positive"
                )));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_ledger_endpoints(mut self, endpoints: impl IntoIterator<Item = String>) -> Self {
        self.ledger_endpoints = normalize_endpoints(endpoints);
        self
    }

    pub fn with_validation_endpoints(
        mut self,
        endpoints: impl IntoIterator<Item = String>,
    ) -> Self {
        self.validation_endpoints = normalize_endpoints(endpoints);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The API key, or a configuration error if none is set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                KernelError::Configuration(format!("no API key configured (set {ENV_API_KEY})"))
            })
    }
}

fn parse_endpoint_list(name: &str, raw: &str) -> Result<Vec<String>> {
    let endpoints = normalize_endpoints(raw.split(','));
    if endpoints.is_empty() {
        return Err(KernelError::Configuration(format!(
            "{name} contains no endpoints"
        )));
    }
    Ok(endpoints)
}
