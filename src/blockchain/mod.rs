//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ConnectOptions (injected wallet / injected provider / RPC URL)
//!     → provider.rs (provider boundary, alloy HTTP provider)
//!     → connection.rs (provider selection, state snapshot)
//!     → contracts.rs (artifact validation, named bindings)
//!
//! codec.rs: wei, byte-string and timestamp conversions, used ad hoc
//! ```
//!
//! # Constraints
//! - Read-only: nothing here signs or submits transactions
//! - Provider failures surface as typed errors, never swallowed
//! - No timeouts in the core; a stalled provider stalls the caller

pub mod codec;
pub mod connection;
pub mod contracts;
pub mod provider;
pub mod types;

pub use connection::ConnectionManager;
pub use contracts::{BoundContract, CompiledArtifact, ContractRegistry, Deployment, DEFAULT_CONTRACT_NAME};
pub use provider::{ChainProvider, ConnectOptions, HttpProvider, InjectedWallet, ProviderHandle, ProviderSource};
pub use types::{
    Amount, ArtifactError, CodecError, ConnectionError, ConnectionResult, ConnectionState, NetworkId,
    ProviderError, ProviderResult, RegistryError,
};
