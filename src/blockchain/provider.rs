//! Provider boundary.
//!
//! # Responsibilities
//! - Define the capability set the connection manager consumes
//! - Model injected wallets and their account-access consent step
//! - Provide an HTTP JSON-RPC implementation backed by alloy
//!
//! # Design Decisions
//! - Object-safe async traits so any source can sit behind one handle
//! - Provider source is chosen explicitly by the caller, never looked up
//! - Large integers are tagged at this boundary (`Amount`), not at use-site

use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;

use crate::blockchain::codec;
use crate::blockchain::types::{Amount, NetworkId, ProviderError, ProviderResult};
use crate::config::schema::ConnectionConfig;

/// Capabilities required from a chain provider.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Live connectivity check.
    async fn is_connected(&self) -> bool;

    /// Identifier of the connected network.
    async fn network_id(&self) -> ProviderResult<NetworkId>;

    /// Accounts exposed by the node or wallet.
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Balance of `address` in wei.
    async fn balance(&self, address: Address) -> ProviderResult<Amount>;

    /// The node's coinbase address.
    async fn coinbase(&self) -> ProviderResult<Address>;

    /// Address format check used when binding contracts.
    fn is_address(&self, candidate: &str) -> bool {
        codec::is_address(candidate)
    }

    /// Short description for logs.
    fn describe(&self) -> String {
        "chain provider".to_string()
    }
}

/// A wallet injected by the host (browser extension, embedded signer...).
#[async_trait]
pub trait InjectedWallet: Send + Sync {
    /// Build a provider from the injected object.
    ///
    /// Fails when the injection itself is broken.
    fn provider(&self) -> ProviderResult<Arc<dyn ChainProvider>>;

    /// Ask the user for account access. May be declined.
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    fn name(&self) -> String {
        "injected wallet".to_string()
    }
}

/// HTTP JSON-RPC provider.
#[derive(Clone)]
pub struct HttpProvider {
    url: url::Url,
    provider: Arc<dyn Provider + Send + Sync>,
}

impl HttpProvider {
    /// Build a provider for `endpoint`. No request is made.
    pub fn connect(endpoint: &str) -> ProviderResult<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| ProviderError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidEndpoint(format!(
                "{endpoint}: unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let provider = ProviderBuilder::new().connect_http(url.clone());

        Ok(Self {
            url,
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
        })
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

fn transport_error(e: impl fmt::Display) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

#[async_trait]
impl ChainProvider for HttpProvider {
    async fn is_connected(&self) -> bool {
        match self.provider.get_block_number().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "Connectivity check failed");
                false
            }
        }
    }

    async fn network_id(&self) -> ProviderResult<NetworkId> {
        let id = self.provider.get_net_version().await.map_err(transport_error)?;
        Ok(NetworkId::from(id))
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.provider.get_accounts().await.map_err(transport_error)
    }

    async fn balance(&self, address: Address) -> ProviderResult<Amount> {
        let balance = self.provider.get_balance(address).await.map_err(transport_error)?;
        Ok(Amount::Big(balance))
    }

    async fn coinbase(&self) -> ProviderResult<Address> {
        let coinbase: Address = self
            .provider
            .client()
            .request("eth_coinbase", ())
            .await
            .map_err(transport_error)?;
        Ok(coinbase)
    }

    fn describe(&self) -> String {
        format!("http provider ({})", self.url)
    }
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider").field("url", &self.url.as_str()).finish()
    }
}

/// Where the bound provider came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSource {
    /// Injected wallet, after the user granted account access.
    Wallet,
    /// Injected read-only provider.
    Injected,
    /// HTTP JSON-RPC endpoint.
    Http,
}

/// The provider a connection manager is bound to.
#[derive(Clone)]
pub struct ProviderHandle {
    source: ProviderSource,
    url: Option<String>,
    provider: Arc<dyn ChainProvider>,
}

impl ProviderHandle {
    pub fn new(source: ProviderSource, provider: Arc<dyn ChainProvider>, url: Option<String>) -> Self {
        Self {
            source,
            url,
            provider,
        }
    }

    pub fn source(&self) -> ProviderSource {
        self.source
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn provider(&self) -> &Arc<dyn ChainProvider> {
        &self.provider
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("source", &self.source)
            .field("url", &self.url)
            .field("provider", &self.provider.describe())
            .finish()
    }
}

/// Provider candidates for `connect`, tried in field order.
#[derive(Clone, Default)]
pub struct ConnectOptions {
    /// Injected wallet; requires the user's consent.
    pub wallet: Option<Arc<dyn InjectedWallet>>,
    /// Injected read-only provider.
    pub injected: Option<Arc<dyn ChainProvider>>,
    /// HTTP fallback endpoint.
    pub endpoint: Option<String>,
}

impl ConnectOptions {
    /// Connect over HTTP only.
    pub fn http(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Build from configuration (HTTP endpoint only).
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::http(config.rpc_url.clone())
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn InjectedWallet>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_injected(mut self, provider: Arc<dyn ChainProvider>) -> Self {
        self.injected = Some(provider);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Endpoint, if present and non-blank.
    pub(crate) fn usable_endpoint(&self) -> Option<String> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("wallet", &self.wallet.as_ref().map(|w| w.name()))
            .field("injected", &self.injected.as_ref().map(|p| p.describe()))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
