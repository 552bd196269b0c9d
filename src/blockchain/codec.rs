//! Display conversions for chain-native values.
//!
//! # Responsibilities
//! - Wei to ether (and back, for round trips)
//! - Fixed-width byte strings to text
//! - Unix seconds to ISO-8601 timestamps
//! - Address format checks
//!
//! # Design Decisions
//! - Stateless free functions, no provider required
//! - Unit math goes through alloy's `format_units`/`parse_units`

use std::str::FromStr;

use alloy::hex;
use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, U256};
use chrono::{DateTime, SecondsFormat};

use crate::blockchain::types::{Amount, CodecError};

/// Decimals between wei and ether.
pub const ETHER_DECIMALS: u8 = 18;

/// Convert a wei amount to ether.
///
/// Precision is limited to what an `f64` can carry.
pub fn to_display_unit(amount: impl Into<Amount>) -> f64 {
    let wei = amount.into().to_u256();
    match format_units(wei, ETHER_DECIMALS) {
        Ok(formatted) => formatted.parse::<f64>().unwrap_or(f64::NAN),
        Err(e) => {
            tracing::warn!(amount = %wei, error = %e, "Unit conversion failed");
            f64::NAN
        }
    }
}

/// Convert an ether amount to wei.
pub fn to_base_unit(ether: f64) -> Result<U256, CodecError> {
    if !ether.is_finite() || ether < 0.0 {
        return Err(CodecError::InvalidAmount(ether.to_string()));
    }
    // f64 Display never uses exponent notation
    let text = ether.to_string();
    parse_units(&text, ETHER_DECIMALS)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| CodecError::InvalidAmount(format!("{text}: {e}")))
}

/// Decode a fixed-width byte string to text, dropping trailing NUL padding.
///
/// Bytes map one-to-one onto chars (latin-1).
pub fn decode_bytes_to_text(bytes: &[u8]) -> String {
    let text: String = bytes.iter().map(|&b| b as char).collect();
    text.trim_end_matches('\0').to_string()
}

/// Same as [`decode_bytes_to_text`] for `0x`-prefixed hex input.
pub fn decode_hex_to_text(encoded: &str) -> Result<String, CodecError> {
    let bytes = hex::decode(encoded).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
    Ok(decode_bytes_to_text(&bytes))
}

/// Format unix seconds as an ISO-8601 UTC timestamp with millisecond precision.
pub fn to_calendar_timestamp(seconds_since_epoch: i64) -> Result<String, CodecError> {
    let millis = seconds_since_epoch
        .checked_mul(1000)
        .ok_or(CodecError::TimestampOutOfRange(seconds_since_epoch))?;
    let instant = DateTime::from_timestamp_millis(millis)
        .ok_or(CodecError::TimestampOutOfRange(seconds_since_epoch))?;
    Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Check whether a string is a well-formed address.
///
/// All-lowercase and all-uppercase hex is accepted as-is; mixed case must
/// carry a valid EIP-55 checksum. The `0x` prefix is optional.
pub fn is_address(candidate: &str) -> bool {
    let digits = candidate.strip_prefix("0x").unwrap_or(candidate);

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    let normalized = format!("0x{digits}");

    if has_lower && has_upper {
        Address::parse_checksummed(&normalized, None).is_ok()
    } else {
        Address::from_str(&normalized).is_ok()
    }
}
