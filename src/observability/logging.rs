//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for hosts that want the default setup
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Initialization is idempotent: a second call leaves the first subscriber

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

/// Filter directive applied when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("chainscope={}", config.log_level)
}

/// Install the global subscriber.
///
/// Returns `false` if one was already installed.
pub fn init(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(level = %config.log_level, json = config.json_logs, "Logging initialized");
            true
        }
        Err(_) => false,
    }
}
