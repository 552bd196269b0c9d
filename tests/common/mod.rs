//! Shared mock providers and wallets for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;
use chainscope::blockchain::{
    Amount, ChainProvider, CompiledArtifact, InjectedWallet, NetworkId, ProviderError, ProviderResult,
};

/// Anvil's first account.
pub const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Anvil's second account.
#[allow(dead_code)]
pub const OTHER_ACCOUNT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// First contract address deployed from `ACCOUNT`.
#[allow(dead_code)]
pub const CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[allow(dead_code)]
pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

/// Programmable in-memory provider that counts its calls.
pub struct MockProvider {
    connected: bool,
    network_id: ProviderResult<NetworkId>,
    accounts: ProviderResult<Vec<Address>>,
    balance: ProviderResult<Amount>,
    coinbase: ProviderResult<Address>,
    coinbase_delay: Option<Duration>,
    coinbase_calls: AtomicUsize,
    network_calls: AtomicUsize,
    balance_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockProvider {
    /// Connected provider on network 5777 with one funded account.
    pub fn new() -> Self {
        Self {
            connected: true,
            network_id: Ok(NetworkId::from(5777u64)),
            accounts: Ok(vec![ACCOUNT]),
            balance: Ok(Amount::Big(U256::from(2 * ONE_ETHER))),
            coinbase: Ok(ACCOUNT),
            coinbase_delay: None,
            coinbase_calls: AtomicUsize::new(0),
            network_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    pub fn with_network(mut self, id: &str) -> Self {
        self.network_id = Ok(NetworkId::from(id));
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = Ok(accounts);
        self
    }

    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.balance = Ok(balance);
        self
    }

    pub fn with_coinbase(mut self, coinbase: Address) -> Self {
        self.coinbase = Ok(coinbase);
        self
    }

    pub fn with_coinbase_delay(mut self, delay: Duration) -> Self {
        self.coinbase_delay = Some(delay);
        self
    }

    pub fn failing_network(mut self) -> Self {
        self.network_id = Err(ProviderError::Transport("net_version failed".into()));
        self
    }

    pub fn failing_accounts(mut self) -> Self {
        self.accounts = Err(ProviderError::Transport("eth_accounts failed".into()));
        self
    }

    pub fn failing_balance(mut self) -> Self {
        self.balance = Err(ProviderError::Transport("eth_getBalance failed".into()));
        self
    }

    pub fn failing_coinbase(mut self) -> Self {
        self.coinbase = Err(ProviderError::Transport("eth_coinbase failed".into()));
        self
    }

    pub fn coinbase_calls(&self) -> usize {
        self.coinbase_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.network_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ChainProvider for MockProvider {
    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn network_id(&self) -> ProviderResult<NetworkId> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        self.network_id.clone()
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.accounts.clone()
    }

    async fn balance(&self, _address: Address) -> ProviderResult<Amount> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance.clone()
    }

    async fn coinbase(&self) -> ProviderResult<Address> {
        self.coinbase_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.coinbase_delay {
            tokio::time::sleep(delay).await;
        }
        self.coinbase.clone()
    }

    fn describe(&self) -> String {
        "mock provider".to_string()
    }
}

/// How a mock wallet answers.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletBehavior {
    /// User grants account access.
    Grant,
    /// User declines account access.
    Decline,
    /// The injected object is broken.
    Fault,
}

/// Injected wallet backed by a `MockProvider`.
pub struct MockWallet {
    behavior: WalletBehavior,
    provider: Arc<MockProvider>,
    requests: AtomicUsize,
}

#[allow(dead_code)]
impl MockWallet {
    pub fn new(behavior: WalletBehavior, provider: Arc<MockProvider>) -> Self {
        Self {
            behavior,
            provider,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InjectedWallet for MockWallet {
    fn provider(&self) -> ProviderResult<Arc<dyn ChainProvider>> {
        match self.behavior {
            WalletBehavior::Fault => Err(ProviderError::Fault("wallet object is not usable".into())),
            _ => Ok(self.provider.clone() as Arc<dyn ChainProvider>),
        }
    }

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            WalletBehavior::Grant => Ok(vec![ACCOUNT]),
            WalletBehavior::Decline => Err(ProviderError::Rejected("user denied account access".into())),
            WalletBehavior::Fault => Err(ProviderError::Fault("wallet object is not usable".into())),
        }
    }

    fn name(&self) -> String {
        "mock wallet".to_string()
    }
}

/// Artifact with a single deployment.
#[allow(dead_code)]
pub fn artifact(network: &str, address: &str) -> CompiledArtifact {
    CompiledArtifact::from_json_str(&format!(
        r#"{{
            "contractName": "Registry",
            "abi": [
                {{
                    "type": "function",
                    "name": "owner",
                    "inputs": [],
                    "outputs": [{{"name": "", "type": "address", "internalType": "address"}}],
                    "stateMutability": "view"
                }}
            ],
            "networks": {{
                "{network}": {{ "address": "{address}" }}
            }}
        }}"#
    ))
    .unwrap()
}
