//! Metrics collection.
//!
//! # Metrics
//! - `chainscope_provider_requests_total` (counter): provider queries by method, outcome
//! - `chainscope_contract_bindings_total` (counter): bind attempts by outcome
//! - `chainscope_contracts_bound` (gauge): current registry size

use metrics::{counter, gauge};

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record a provider round trip.
pub fn record_provider_request(method: &'static str, ok: bool) {
    counter!(
        "chainscope_provider_requests_total",
        "method" => method,
        "outcome" => outcome(ok)
    )
    .increment(1);
}

/// Record a contract bind attempt.
pub fn record_contract_binding(ok: bool) {
    counter!("chainscope_contract_bindings_total", "outcome" => outcome(ok)).increment(1);
}

/// Record the number of bound contracts.
pub fn record_contracts_bound(count: usize) {
    gauge!("chainscope_contracts_bound").set(count as f64);
}
