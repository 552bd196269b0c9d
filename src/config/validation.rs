//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Endpoint must be an http(s) URL
//! - Pinned network id and log level must be usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExplorerConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ExplorerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("connection.rpc_url is empty")]
    EmptyRpcUrl,

    #[error("connection.rpc_url '{url}' is not a valid URL: {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("connection.rpc_url scheme '{0}' is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("connection.network_id is set but empty")]
    EmptyNetworkId,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ExplorerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let connection = &config.connection;

    let rpc_url = connection.rpc_url.trim();
    if rpc_url.is_empty() {
        errors.push(ValidationError::EmptyRpcUrl);
    } else {
        match rpc_url.parse::<url::Url>() {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidRpcUrl {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if matches!(connection.network_id.as_deref(), Some(id) if id.trim().is_empty()) {
        errors.push(ValidationError::EmptyNetworkId);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
