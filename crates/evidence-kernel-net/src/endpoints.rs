//! Network names and their default endpoint tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NetError;

/// A ledger network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Integrationnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Integrationnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Integrationnet => "integrationnet",
        }
    }

    /// Load-balanced endpoints queried for hash validation and data retrieval,
    /// in the order they are tried.
    pub fn validation_endpoints(&self) -> Vec<String> {
        let net = self.as_str();
        vec![
            format!("https://l0-lb-{net}.constellationnetwork.io"),
            format!("https://l1-lb-{net}.constellationnetwork.io"),
            format!("https://be-{net}.constellationnetwork.io"),
        ]
    }

    /// Endpoints accepting transaction writes.
    pub fn ledger_endpoints(&self) -> Vec<String> {
        let net = self.as_str();
        vec![
            format!("https://l0-lb-{net}.constellationnetwork.io"),
            format!("https://l1-lb-{net}.constellationnetwork.io"),
        ]
    }

    /// Base URL of the fingerprint attestation API.
    pub fn attestation_base_url(&self) -> String {
        match self {
            Network::Mainnet => "https://de-api.constellationnetwork.io/v1".to_string(),
            other => format!("https://de-api-{}.constellationnetwork.io/v1", other.as_str()),
        }
    }

    /// Base URL of the public fingerprint explorer.
    pub fn explorer_base_url(&self) -> String {
        match self {
            Network::Mainnet => "https://digitalevidence.constellationnetwork.io".to_string(),
            other => format!(
                "https://digitalevidence-{}.constellationnetwork.io",
                other.as_str()
            ),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "integrationnet" => Ok(Network::Integrationnet),
            other => Err(NetError::Configuration(format!("unknown network: {other:?}"))),
        }
    }
}

/// Normalize a base URL: trim whitespace and trailing slashes.
pub fn normalize_endpoint(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Normalize a list of endpoints, dropping empties.
pub fn normalize_endpoints<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .map(|u| normalize_endpoint(u.as_ref()))
        .filter(|u| !u.is_empty())
        .collect()
}
