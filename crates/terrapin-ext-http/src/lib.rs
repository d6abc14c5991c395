//! # Terrapin Ext HTTP
//!
//! [`BondDataSource`] implementation backed by the Terrapin Finance REST API.
//!
//! Every call is a `POST` with a JSON body, authenticated with a bearer token,
//! answering `{"data": [...]}`. No retries, pagination or caching are done
//! here; a failed call surfaces as a [`TraitError`].

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use terrapin_core::ids::Isin;
use terrapin_core::records::{BondReference, BondSummary, CashflowRecord};
use terrapin_traits::error::TraitError;
use terrapin_traits::reference_data::{BondDataSource, BondSearchFilter};

/// Default Terrapin API root.
pub const DEFAULT_BASE_URL: &str = "https://terrapinfinance.com/api/v1/";

/// Environment variable holding the Terrapin API key.
pub const API_KEY_ENV: &str = "TERRAPIN_API_KEY";

const MAX_ERROR_BODY: usize = 512;

/// Upstream connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrapinConfig {
    /// API root; endpoint names are joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (none by default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for TerrapinConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Response envelope shared by all endpoints.
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

#[derive(Serialize)]
struct IsinsRequest<'a> {
    isins: &'a [Isin],
}

/// Terrapin Finance API client.
#[derive(Clone)]
pub struct TerrapinClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl fmt::Debug for TerrapinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrapinClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TerrapinClient {
    /// Create a client.
    ///
    /// Without an API key requests are sent unauthenticated and the upstream
    /// is expected to reject them.
    pub fn new(config: &TerrapinConfig, api_key: Option<String>) -> Result<Self, TraitError> {
        let mut root = config.base_url.clone();
        if !root.ends_with('/') {
            root.push('/');
        }
        let base_url = Url::parse(&root).map_err(|e| {
            TraitError::InvalidInput(format!("invalid Terrapin URL `{}`: {}", config.base_url, e))
        })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TraitError::Internal(format!("HTTP client build error: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Create a client with the API key taken from [`API_KEY_ENV`].
    pub fn from_env(config: &TerrapinConfig) -> Result<Self, TraitError> {
        Self::new(config, std::env::var(API_KEY_ENV).ok())
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// API root in use.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<Vec<T>, TraitError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| TraitError::InvalidInput(format!("bad endpoint `{}`: {}", endpoint, e)))?;

        let mut req = self.client.post(url).json(body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TraitError::Timeout
            } else {
                TraitError::ConnectionFailed(format!("{}: {}", endpoint, e))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let mut text = resp.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TraitError::AuthenticationFailed(format!("{} ({}): {}", endpoint, status, text))
                }
                _ => TraitError::HttpStatus {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TraitError::ConnectionFailed(format!("{}: {}", endpoint, e)))?;
        let envelope: DataEnvelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| TraitError::ParseError(format!("{}: {}", endpoint, e)))?;

        debug!(endpoint, records = envelope.data.len(), "Terrapin call complete");
        Ok(envelope.data)
    }
}

#[async_trait]
impl BondDataSource for TerrapinClient {
    /// POST /bond_search
    async fn search_bonds(&self, filter: &BondSearchFilter) -> Result<Vec<BondSummary>, TraitError> {
        self.post("bond_search", filter).await
    }

    /// POST /bond_reference
    async fn bond_reference(&self, isins: &[Isin]) -> Result<Vec<BondReference>, TraitError> {
        self.post("bond_reference", &IsinsRequest { isins }).await
    }

    /// POST /bond_cashflows
    async fn bond_cashflows(&self, isins: &[Isin]) -> Result<Vec<CashflowRecord>, TraitError> {
        self.post("bond_cashflows", &IsinsRequest { isins }).await
    }

    fn name(&self) -> &str {
        "terrapin"
    }
}
