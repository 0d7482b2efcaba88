use alloy::primitives::Address;
use std::str::FromStr;

use crate::error::{ContractError, Result};

/// Fails with `InvalidArgument` when `value` is empty or only whitespace.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContractError::InvalidArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Parses a `0x`-prefixed, 20-byte hex address. Checksums are not enforced.
pub fn validate_address(address: &str) -> Result<Address> {
    let address = address.trim();
    let invalid = |reason: &str| {
        ContractError::InvalidArgument(format!("'{}' is not an address: {}", address, reason))
    };

    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| invalid("missing 0x prefix"))?;
    if hex_part.len() != 40 {
        return Err(invalid("expected 40 hex characters"));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    Address::from_str(hex_part).map_err(|e| invalid(&e.to_string()))
}

/// Function names must be Solidity identifiers.
pub fn validate_function_name(function_name: &str) -> Result<()> {
    let mut chars = function_name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !starts_ok || !rest_ok {
        return Err(ContractError::Encoding(format!(
            "'{}' is not a valid function name",
            function_name
        )));
    }
    Ok(())
}

pub fn validate_network(network: &str, available_networks: &[String]) -> Result<()> {
    if available_networks.iter().any(|n| n == network) {
        return Ok(());
    }
    Err(ContractError::InvalidArgument(format!(
        "Unknown network '{}' (configured: {})",
        network,
        available_networks.join(", ")
    )))
}

/// Hex form of raw bytes with the `0x` prefix nodes expect.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

const RPC_HINTS: &[(&[&str], &str)] = &[
    (&["execution reverted"], "Contract call reverted"),
    (
        &["insufficient funds"],
        "Sender cannot cover value plus gas",
    ),
    (&["nonce too low"], "Nonce already used by a mined transaction"),
    (
        &["replacement transaction underpriced"],
        "Gas price too low to replace the pending transaction",
    ),
    (
        &["intrinsic gas too low", "gas required exceeds allowance"],
        "Gas limit too low",
    ),
    (
        &["connection refused", "network unreachable", "dns error"],
        "Cannot reach the RPC endpoint",
    ),
    (&["timed out", "timeout"], "RPC request timed out"),
    (&["rate limit", "429"], "RPC endpoint is rate limiting requests"),
];

/// Prefixes common node and connection failures with a short explanation.
pub fn interpret_rpc_error(error: &str) -> String {
    let lower = error.to_lowercase();
    RPC_HINTS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, hint)| format!("{}: {}", hint, error))
        .unwrap_or_else(|| format!("RPC error: {}", error))
}
