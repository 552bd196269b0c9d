//! Contract registry.
//!
//! # Responsibilities
//! - Parse compiled artifacts (ABI + per-network deployments)
//! - Validate an artifact against a network id before binding
//! - Store bound contracts by name, unnamed ones under `"default"`
//!
//! # Design Decisions
//! - Validation failures are a `false` return, not an error, so callers can
//!   probe several artifacts cheaply
//! - Ordered map, rebinding a name replaces it in place
//! - Lookup distinguishes "nothing bound" from "wrong name"

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use alloy::contract::{ContractInstance, Interface};
use alloy::json_abi::JsonAbi;
use alloy::network::Network;
use alloy::primitives::Address;
use alloy::providers::Provider;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::blockchain::types::{ArtifactError, NetworkId, RegistryError};
use crate::observability::metrics;

/// Key used when a contract is bound without a name.
pub const DEFAULT_CONTRACT_NAME: &str = "default";

/// Map an optional name to its registry key.
pub fn contract_key(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_CONTRACT_NAME,
    }
}

/// Deployment metadata for one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// Build output describing a contract's interface and deployments.
///
/// Unknown fields (bytecode, source maps...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompiledArtifact {
    #[serde(default)]
    pub abi: Option<JsonAbi>,
    #[serde(default)]
    pub networks: BTreeMap<String, Deployment>,
}

impl CompiledArtifact {
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Deployment entry for `network_id`, if any.
    pub fn deployment(&self, network_id: &NetworkId) -> Option<&Deployment> {
        self.networks.get(network_id.as_str())
    }
}

/// A contract resolved to a deployment address.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundContract {
    name: String,
    network_id: NetworkId,
    address: Address,
    abi: Arc<JsonAbi>,
}

impl BoundContract {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Whether the ABI declares a function called `name`.
    pub fn has_function(&self, name: &str) -> bool {
        self.abi.function(name).is_some()
    }

    /// Dynamic-ABI interface for encoding and decoding calls.
    pub fn interface(&self) -> Interface {
        Interface::new(self.abi.as_ref().clone())
    }

    /// Callable instance over an alloy provider.
    pub fn instance<P, N>(&self, provider: P) -> ContractInstance<P, N>
    where
        P: Provider<N>,
        N: Network,
    {
        ContractInstance::new(self.address, provider, self.interface())
    }
}

/// Name → bound contract store. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    inner: Arc<RwLock<IndexMap<String, BoundContract>>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `artifact` on `network_id` and store it under `name`.
    ///
    /// Returns `false` without touching the registry when the ABI is
    /// missing, the network has no deployment, or the address fails
    /// `is_address`.
    pub fn bind(
        &self,
        artifact: &CompiledArtifact,
        name: Option<&str>,
        network_id: &NetworkId,
        is_address: impl Fn(&str) -> bool,
    ) -> bool {
        let key = contract_key(name);

        let Some(abi) = artifact.abi.as_ref() else {
            tracing::warn!(contract = key, "Artifact has no ABI");
            metrics::record_contract_binding(false);
            return false;
        };

        let Some(deployment) = artifact.deployment(network_id) else {
            tracing::warn!(
                contract = key,
                network_id = %network_id,
                "Artifact has no deployment for network"
            );
            metrics::record_contract_binding(false);
            return false;
        };

        let Some(raw_address) = deployment.address.as_deref() else {
            tracing::warn!(contract = key, network_id = %network_id, "Deployment has no address");
            metrics::record_contract_binding(false);
            return false;
        };

        let address = match raw_address.parse::<Address>() {
            Ok(address) if is_address(raw_address) => address,
            _ => {
                tracing::warn!(
                    contract = key,
                    address = raw_address,
                    "Deployment address is not valid"
                );
                metrics::record_contract_binding(false);
                return false;
            }
        };

        let bound = BoundContract {
            name: key.to_string(),
            network_id: network_id.clone(),
            address,
            abi: Arc::new(abi.clone()),
        };

        let count = {
            let mut contracts = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            contracts.insert(key.to_string(), bound);
            contracts.len()
        };

        tracing::info!(contract = key, network_id = %network_id, %address, "Contract bound");
        metrics::record_contract_binding(true);
        metrics::record_contracts_bound(count);
        true
    }

    /// Look up a binding; `None` or `""` means `"default"`.
    pub fn get(&self, name: Option<&str>) -> Result<BoundContract, RegistryError> {
        let contracts = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if contracts.is_empty() {
            return Err(RegistryError::Empty);
        }

        let key = contract_key(name);
        contracts
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    /// Number of distinct bound names.
    pub fn count(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Bound names in binding order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).clear();
        metrics::record_contracts_bound(0);
    }
}
