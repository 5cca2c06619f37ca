//! EVM address encoding: Keccak-256 of the public key, EIP-55 checksum

use crate::crypto::hash;
use crate::error::{Error, Result};

/// Derive the checksummed address from a 65-byte uncompressed public key.
pub fn encode(uncompressed: &[u8]) -> Result<String> {
    if uncompressed.len() != 65 || uncompressed[0] != 0x04 {
        return Err(Error::Address(
            "Expected a 65-byte uncompressed public key".to_string(),
        ));
    }
    let digest = hash::keccak256(&uncompressed[1..]);
    Ok(to_eip55(&digest[12..]))
}

/// Apply the EIP-55 mixed-case checksum to a 20-byte address.
fn to_eip55(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let digest = hash::keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Validate an address string.
///
/// All-lowercase and all-uppercase hex are accepted; mixed case must carry
/// a correct EIP-55 checksum.
pub fn validate(address: &str) -> Result<()> {
    let body = address
        .strip_prefix("0x")
        .ok_or_else(|| Error::Address("Missing 0x prefix".to_string()))?;
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Address("Expected 40 hex characters".to_string()));
    }

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let bytes = hex::decode(body.to_ascii_lowercase())
            .map_err(|e| Error::Address(format!("Invalid hex: {}", e)))?;
        if to_eip55(&bytes) != address {
            return Err(Error::Address("EIP-55 checksum mismatch".to_string()));
        }
    }
    Ok(())
}
