//! Connection lifecycle and state loading.
//!
//! # Responsibilities
//! - Select a provider (injected wallet, injected provider, HTTP endpoint)
//! - Track a best-effort snapshot of network, account and balance
//! - Resolve network ids for contract binding
//!
//! # Design Decisions
//! - Provider handle is swapped atomically on reconnect
//! - Each bind starts a new session; answers from a replaced provider are
//!   dropped instead of written into the new session's state
//! - State fields resolve and cache independently; a failed step keeps
//!   whatever earlier steps wrote
//! - State loading after `connect` runs in the background and never fails it
//! - No timeouts or retries here; callers wrap calls as needed

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;

use crate::blockchain::contracts::{CompiledArtifact, ContractRegistry};
use crate::blockchain::provider::{ChainProvider, ConnectOptions, HttpProvider, ProviderHandle, ProviderSource};
use crate::blockchain::types::{
    ConnectionConfig, ConnectionError, ConnectionResult, ConnectionState, NetworkId, ProviderError,
};
use crate::blockchain::codec;
use crate::observability::metrics;

/// Owns the provider handle and the connection state.
///
/// Cloning is cheap and shares everything.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    provider: ArcSwapOption<ProviderHandle>,
    session: RwLock<Session>,
    contracts: ContractRegistry,
    config: ConnectionConfig,
}

/// State plus the generation of the provider it belongs to.
///
/// The generation changes whenever the provider is swapped, under the same
/// write lock, so a reader sees a matching provider and generation.
#[derive(Default)]
struct Session {
    generation: u64,
    state: ConnectionState,
}

/// Provider captured at the start of a query.
struct Bound {
    provider: Arc<dyn ChainProvider>,
    generation: u64,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    /// Create a manager with default settings.
    pub fn new() -> Self {
        Self::from_config(&ConnectionConfig::default())
    }

    /// Create a manager from configuration. Nothing is connected yet.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider: ArcSwapOption::empty(),
                session: RwLock::new(Session::default()),
                contracts: ContractRegistry::new(),
                config: config.clone(),
            }),
        }
    }

    /// Bind a provider.
    ///
    /// Candidates are tried in order: injected wallet (after the user grants
    /// account access), injected provider, HTTP endpoint. On success the
    /// state is reset and reloaded in the background; that reload does not
    /// affect the result. Must run inside a tokio runtime.
    pub async fn connect(&self, options: ConnectOptions) -> ConnectionResult<ProviderHandle> {
        let endpoint = options.usable_endpoint();

        let handle = if let Some(wallet) = options.wallet.as_ref() {
            let provider = wallet.provider().map_err(|e| {
                ConnectionError::ProviderUnavailable(format!("{} could not be used: {e}", wallet.name()))
            })?;

            let accounts = wallet.request_accounts().await.map_err(|e| {
                ConnectionError::ProviderUnavailable(format!("{} denied account access: {e}", wallet.name()))
            })?;

            tracing::info!(
                wallet = %wallet.name(),
                accounts = accounts.len(),
                "Wallet granted account access"
            );
            ProviderHandle::new(ProviderSource::Wallet, provider, endpoint.clone())
        } else if let Some(provider) = options.injected.clone() {
            tracing::info!(provider = %provider.describe(), "Using injected provider");
            ProviderHandle::new(ProviderSource::Injected, provider, endpoint.clone())
        } else {
            let Some(url) = endpoint.as_deref() else {
                return Err(ConnectionError::ProviderUnavailable(
                    "no injected provider and no RPC endpoint".to_string(),
                ));
            };

            let provider = HttpProvider::connect(url)
                .map_err(|e| ConnectionError::ProviderUnavailable(e.to_string()))?;
            tracing::info!(rpc_url = %url, "Using HTTP provider");
            ProviderHandle::new(ProviderSource::Http, Arc::new(provider), endpoint.clone())
        };

        let handle = Arc::new(handle);
        let connected = handle.provider().is_connected().await;

        self.rebind(
            Some(handle.clone()),
            ConnectionState {
                is_connected: connected,
                provider_url: endpoint.clone(),
                ..ConnectionState::default()
            },
        );

        tracing::info!(
            source = ?handle.source(),
            provider_url = ?endpoint,
            connected,
            "Provider bound"
        );

        if self.inner.config.load_state_on_connect {
            let manager = self.clone();
            tokio::spawn(async move {
                match manager.load_state().await {
                    Ok(state) => tracing::debug!(?state, "Connection state loaded"),
                    Err(e) => tracing::warn!(error = %e, "Connection state only partially loaded"),
                }
            });
        }

        Ok(handle.as_ref().clone())
    }

    /// Connect, then bind `artifact` as a contract.
    ///
    /// Returns the bind outcome; connection failures are errors.
    pub async fn connect_with_contract(
        &self,
        options: ConnectOptions,
        artifact: &CompiledArtifact,
        name: Option<&str>,
        network_id: Option<NetworkId>,
    ) -> ConnectionResult<bool> {
        self.connect(options).await?;
        self.bind_contract(artifact, name, network_id).await
    }

    /// Drop the provider and reset state. Bound contracts are kept.
    pub fn disconnect(&self) {
        self.rebind(None, ConnectionState::default());
        tracing::info!("Provider released");
    }

    /// Resolve coinbase, network id, main account and its balance, in that
    /// order.
    ///
    /// The first failing step's error is returned. Steps that already
    /// resolved stay in the state.
    pub async fn load_state(&self) -> ConnectionResult<ConnectionState> {
        self.get_coinbase().await?;
        self.get_network_id().await?;
        let account = self.get_main_account().await?;
        self.get_balance(account).await?;
        Ok(self.state())
    }

    /// Query and cache the network identifier.
    pub async fn get_network_id(&self) -> ConnectionResult<NetworkId> {
        let bound = self.require_provider()?;

        let network_id = bound.provider.network_id().await.map_err(|e| {
            metrics::record_provider_request("network_id", false);
            tracing::warn!(error = %e, "Network id query failed");
            ConnectionError::NetworkUnavailable(e)
        })?;
        metrics::record_provider_request("network_id", true);

        self.update_state(bound.generation, |state| state.network_id = Some(network_id.clone()));
        Ok(network_id)
    }

    /// Query the account list and cache its first entry.
    ///
    /// `Ok(None)` when the provider exposes no accounts.
    pub async fn get_main_account(&self) -> ConnectionResult<Option<Address>> {
        let bound = self.require_provider()?;

        let accounts = bound.provider.accounts().await.map_err(|e| {
            metrics::record_provider_request("accounts", false);
            tracing::warn!(error = %e, "Account query failed");
            ConnectionError::AccountUnavailable(e)
        })?;
        metrics::record_provider_request("accounts", true);

        let main_account = accounts.first().copied();
        if main_account.is_none() {
            tracing::debug!("Provider exposes no accounts");
        }

        self.update_state(bound.generation, |state| state.main_account = main_account);
        Ok(main_account)
    }

    /// Return the coinbase, querying the provider only on first use.
    ///
    /// Concurrent first calls may each query; the last one to finish wins.
    pub async fn get_coinbase(&self) -> ConnectionResult<Address> {
        let cached = self.read_state().state.coinbase;
        if let Some(coinbase) = cached {
            tracing::debug!(%coinbase, "Coinbase served from cache");
            return Ok(coinbase);
        }

        let bound = self.require_provider()?;

        let coinbase = bound.provider.coinbase().await.map_err(|e| {
            metrics::record_provider_request("coinbase", false);
            tracing::warn!(error = %e, "Coinbase query failed");
            ConnectionError::CoinbaseUnavailable(e)
        })?;
        metrics::record_provider_request("coinbase", true);

        self.update_state(bound.generation, |state| state.coinbase = Some(coinbase));
        Ok(coinbase)
    }

    /// Query and cache the balance of `address` in wei.
    ///
    /// Fails with `BalanceUnavailable` when `address` is `None`. Amounts
    /// above `u128::MAX` saturate.
    pub async fn get_balance(&self, address: Option<Address>) -> ConnectionResult<u128> {
        let Some(account) = address else {
            return Err(ConnectionError::BalanceUnavailable {
                account: "<none>".to_string(),
                source: ProviderError::NoAccount,
            });
        };

        let bound = self.require_provider()?;

        let amount = bound.provider.balance(account).await.map_err(|e| {
            metrics::record_provider_request("balance", false);
            tracing::warn!(%account, error = %e, "Balance query failed");
            ConnectionError::BalanceUnavailable {
                account: account.to_string(),
                source: e,
            }
        })?;
        metrics::record_provider_request("balance", true);

        let balance = amount.to_native();
        self.update_state(bound.generation, |state| state.balance = balance);
        Ok(balance)
    }

    /// Bind a compiled artifact under `name` (or `"default"`).
    ///
    /// Without an explicit `network_id` the configured one is used, then the
    /// provider is asked. Artifact validation failures yield `Ok(false)`;
    /// only network resolution is an error.
    pub async fn bind_contract(
        &self,
        artifact: &CompiledArtifact,
        name: Option<&str>,
        network_id: Option<NetworkId>,
    ) -> ConnectionResult<bool> {
        let network_id = match network_id.or_else(|| self.pinned_network_id()) {
            Some(id) => id,
            None => self.get_network_id().await?,
        };

        let provider = self.inner.provider.load_full();
        let bound = match provider {
            Some(handle) => {
                let provider = handle.provider().clone();
                self.inner
                    .contracts
                    .bind(artifact, name, &network_id, |candidate| provider.is_address(candidate))
            }
            None => self.inner.contracts.bind(artifact, name, &network_id, codec::is_address),
        };

        Ok(bound)
    }

    /// Connected and at least one contract bound.
    pub fn is_ready(&self) -> bool {
        self.is_connected() && self.inner.contracts.count() > 0
    }

    /// Whether the provider reported connectivity when it was bound.
    pub fn is_connected(&self) -> bool {
        self.read_state().state.is_connected
    }

    /// Snapshot of the connection state.
    pub fn state(&self) -> ConnectionState {
        self.read_state().state.clone()
    }

    /// The bound provider, if any.
    pub fn provider(&self) -> Option<ProviderHandle> {
        self.inner.provider.load_full().map(|handle| handle.as_ref().clone())
    }

    /// Contracts bound through this manager.
    pub fn contracts(&self) -> &ContractRegistry {
        &self.inner.contracts
    }

    /// Settings this manager was built with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    fn pinned_network_id(&self) -> Option<NetworkId> {
        self.inner
            .config
            .network_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(NetworkId::from)
    }

    fn require_provider(&self) -> ConnectionResult<Bound> {
        let session = self.read_state();
        self.inner
            .provider
            .load_full()
            .map(|handle| Bound {
                provider: handle.provider().clone(),
                generation: session.generation,
            })
            .ok_or_else(|| ConnectionError::ProviderUnavailable("not connected".to_string()))
    }

    /// Swap the provider and start a new session with `state`.
    fn rebind(&self, handle: Option<Arc<ProviderHandle>>, state: ConnectionState) {
        let mut session = self.inner.session.write().unwrap_or_else(PoisonError::into_inner);
        self.inner.provider.store(handle);
        session.generation = session.generation.wrapping_add(1);
        session.state = state;
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` unless the provider was replaced since `generation` began.
    fn update_state(&self, generation: u64, f: impl FnOnce(&mut ConnectionState)) {
        let mut session = self.inner.session.write().unwrap_or_else(PoisonError::into_inner);
        if session.generation != generation {
            tracing::debug!(
                started = generation,
                current = session.generation,
                "Dropping answer from a replaced provider"
            );
            return;
        }
        f(&mut session.state);
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("provider", &self.provider())
            .field("state", &self.state())
            .field("contracts", &self.inner.contracts.count())
            .finish()
    }
}
