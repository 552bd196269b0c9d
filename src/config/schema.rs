//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Provider and state-loading settings.
    pub connection: ConnectionConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// HTTP JSON-RPC endpoint used when no injected provider is given.
    pub rpc_url: String,

    /// Network to bind contracts against without asking the provider.
    pub network_id: Option<String>,

    /// Load coinbase, network, account and balance right after connecting.
    pub load_state_on_connect: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            network_id: None,
            load_state_on_connect: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
