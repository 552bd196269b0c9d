//! Chain-specific types and error definitions.

use std::fmt;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export ConnectionConfig from config module to avoid duplication
pub use crate::config::schema::ConnectionConfig;

/// Network identifier as reported by `net_version`.
///
/// Providers report numeric ids while compiled artifacts key their
/// deployments by decimal strings, so the identifier is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for NetworkId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for NetworkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NetworkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wei amount as handed over by a provider.
///
/// The provider decides the representation; consumers never guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// Fits the native numeric type.
    Native(u128),
    /// Full 256-bit representation.
    Big(U256),
}

impl Amount {
    /// Convert to the native numeric type.
    ///
    /// Values above `u128::MAX` saturate. This is a known precision limit.
    pub fn to_native(self) -> u128 {
        match self {
            Amount::Native(value) => value,
            Amount::Big(value) => match u128::try_from(value) {
                Ok(native) => native,
                Err(_) => {
                    tracing::warn!(amount = %value, "Amount exceeds native range, saturating");
                    u128::MAX
                }
            },
        }
    }

    /// Widen to the 256-bit representation.
    pub fn to_u256(self) -> U256 {
        match self {
            Amount::Native(value) => U256::from(value),
            Amount::Big(value) => value,
        }
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount::Native(value)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount::Big(value)
    }
}

/// Snapshot of what is known about the current connection.
///
/// Fields resolve independently; a connected state says nothing about
/// whether account or balance have been loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionState {
    /// Provider reported itself reachable.
    pub is_connected: bool,
    /// Resolved network identifier.
    pub network_id: Option<NetworkId>,
    /// First resolved coinbase. Never re-queried once set.
    pub coinbase: Option<Address>,
    /// First entry of the provider's account list.
    pub main_account: Option<Address>,
    /// Balance of `main_account` in wei.
    pub balance: u128,
    /// Endpoint used to construct the provider.
    pub provider_url: Option<String>,
}

/// Errors raised at the provider boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// RPC transport or node error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The wallet user declined the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The injected object could not be used at all.
    #[error("injection fault: {0}")]
    Fault(String),

    /// Endpoint string could not be turned into a provider.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// No account was available to query.
    #[error("no account available")]
    NoAccount,
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while connecting or loading state.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// No usable connection source, or the user declined access.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Network identifier query failed.
    #[error("network id not available: {0}")]
    NetworkUnavailable(#[source] ProviderError),

    /// Account list query failed.
    #[error("accounts not available: {0}")]
    AccountUnavailable(#[source] ProviderError),

    /// Coinbase query failed.
    #[error("coinbase not available: {0}")]
    CoinbaseUnavailable(#[source] ProviderError),

    /// Balance query failed.
    #[error("balance not available for account {account}: {source}")]
    BalanceUnavailable {
        account: String,
        #[source]
        source: ProviderError,
    },
}

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Lookup failures on the contract registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Nothing has been bound yet.
    #[error("no contract has been bound")]
    Empty,

    /// Bindings exist but not under this name.
    #[error("contract '{0}' does not exist")]
    NotFound(String),
}

/// Failures loading a compiled artifact from disk or text.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Value conversion failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Amount is negative, not finite, or not representable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Timestamp cannot be represented as a calendar date.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),

    /// Input is not valid hex.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),
}
