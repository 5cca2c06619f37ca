//! Base58Check address encoding
//!
//! Version byte plus payload, protected by the first four bytes of a
//! double-SHA256 checksum. The prefixed variant (Aeternity style) replaces
//! the version byte with a printable chain tag outside the Base58 data.

use crate::crypto::hash;
use crate::error::{Error, Result};

/// Encode `version || payload || checksum` as Base58.
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = hash::double_sha256(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).into_string()
}

/// Decode a Base58Check address, verifying checksum, version byte and
/// payload length before returning the payload.
pub fn decode_check(address: &str, version: u8, payload_len: usize) -> Result<Vec<u8>> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| Error::Address(format!("Invalid Base58 string: {}", e)))?;
    if data.len() != payload_len + 5 {
        return Err(Error::Address(format!(
            "Address length mismatch: expected {} bytes, got {}",
            payload_len + 5,
            data.len()
        )));
    }

    let (body, checksum) = data.split_at(data.len() - 4);
    let expected = hash::double_sha256(body);
    if checksum != &expected[..4] {
        return Err(Error::Address("Checksum mismatch".to_string()));
    }
    if body[0] != version {
        return Err(Error::Address(format!(
            "Version byte mismatch: expected {:#04x}, got {:#04x}",
            version, body[0]
        )));
    }
    Ok(body[1..].to_vec())
}

/// Encode `payload || checksum` as Base58 behind a printable prefix.
pub fn encode_prefixed(prefix: &str, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    let checksum = hash::double_sha256(payload);
    data.extend_from_slice(&checksum[..4]);
    format!("{}{}", prefix, bs58::encode(data).into_string())
}

/// Decode a prefixed Base58Check address, verifying prefix, checksum and
/// payload length.
pub fn decode_prefixed(address: &str, prefix: &str, payload_len: usize) -> Result<Vec<u8>> {
    let encoded = address
        .strip_prefix(prefix)
        .ok_or_else(|| Error::Address(format!("Missing {} prefix", prefix)))?;
    let data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::Address(format!("Invalid Base58 string: {}", e)))?;
    if data.len() != payload_len + 4 {
        return Err(Error::Address(format!(
            "Address length mismatch: expected {} bytes, got {}",
            payload_len + 4,
            data.len()
        )));
    }

    let (payload, checksum) = data.split_at(payload_len);
    let expected = hash::double_sha256(payload);
    if checksum != &expected[..4] {
        return Err(Error::Address("Checksum mismatch".to_string()));
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let payload = [0x5au8; 20];
        let address = encode_check(0x1e, &payload);
        assert_eq!(decode_check(&address, 0x1e, 20).unwrap(), payload);
    }

    #[test]
    fn test_wrong_version_rejected() {
        // Valid checksum under the Dogecoin version byte, checked as Litecoin
        let address = encode_check(0x1e, &[0x5au8; 20]);
        assert!(decode_check(&address, 0x30, 20).is_err());
    }

    #[test]
    fn test_corrupted_character_rejected() {
        let address = encode_check(0x30, &[0x77u8; 20]);
        let mut corrupted = address.into_bytes();
        corrupted[10] = if corrupted[10] == b'2' { b'3' } else { b'2' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(decode_check(&corrupted, 0x30, 20).is_err());
    }

    #[test]
    fn test_prefixed_round_trip() {
        let payload = [0x33u8; 32];
        let address = encode_prefixed("ak_", &payload);
        assert!(address.starts_with("ak_"));
        assert_eq!(decode_prefixed(&address, "ak_", 32).unwrap(), payload);
        assert!(decode_prefixed(&address, "ok_", 32).is_err());
    }
}
