//! Chain connection and contract binding library.
//!
//! Establishes a provider (injected wallet, injected provider or HTTP
//! endpoint), keeps a best-effort snapshot of network, account and balance,
//! binds deployed contracts from compiled artifacts, and converts chain
//! values for display.

pub mod blockchain;
pub mod config;
pub mod observability;

pub use blockchain::{codec, ConnectionManager, ContractRegistry};
pub use config::ExplorerConfig;
