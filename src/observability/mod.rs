//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! blockchain subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (provider request and binding counters)
//!
//! Consumers:
//!     → whatever subscriber / recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Library code only emits; the host decides where events go
//! - Metrics go through the `metrics` facade and are no-ops without a recorder

pub mod logging;
pub mod metrics;
