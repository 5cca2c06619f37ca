//! Bech32 address encoding with per-chain human-readable prefixes

use bech32::{FromBase32, ToBase32, Variant};

use crate::error::{Error, Result};

/// Encode `payload` under `hrp` with a Bech32 checksum.
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String> {
    bech32::encode(hrp, payload.to_base32(), Variant::Bech32)
        .map_err(|e| Error::Address(format!("Bech32 encoding failed: {}", e)))
}

/// Encode a segwit program: the witness version leads the data part.
pub fn encode_witness(hrp: &str, witness_version: u8, program: &[u8]) -> Result<String> {
    let version = bech32::u5::try_from_u8(witness_version)
        .map_err(|e| Error::Address(format!("Invalid witness version: {}", e)))?;
    let mut data = vec![version];
    data.extend(program.to_base32());
    bech32::encode(hrp, data, Variant::Bech32)
        .map_err(|e| Error::Address(format!("Bech32 encoding failed: {}", e)))
}

/// Decode and verify a plain Bech32 address, returning the payload.
///
/// The checksum, the human-readable prefix and the payload length must all
/// match before the payload is accepted.
pub fn decode(address: &str, expected_hrp: &str, payload_len: usize) -> Result<Vec<u8>> {
    let (hrp, data, variant) = bech32::decode(address)
        .map_err(|e| Error::Address(format!("Invalid Bech32 string: {}", e)))?;
    if variant != Variant::Bech32 {
        return Err(Error::Address("Expected Bech32 variant".to_string()));
    }
    if hrp != expected_hrp {
        return Err(Error::Address(format!(
            "Prefix mismatch: expected {}, got {}",
            expected_hrp, hrp
        )));
    }

    let payload = Vec::<u8>::from_base32(&data)
        .map_err(|e| Error::Address(format!("Invalid Bech32 payload: {}", e)))?;
    if payload.len() != payload_len {
        return Err(Error::Address(format!(
            "Payload length mismatch: expected {}, got {}",
            payload_len,
            payload.len()
        )));
    }
    Ok(payload)
}

/// Decode and verify a segwit address, returning the witness program.
pub fn decode_witness(
    address: &str,
    expected_hrp: &str,
    witness_version: u8,
    program_len: usize,
) -> Result<Vec<u8>> {
    let (hrp, data, variant) = bech32::decode(address)
        .map_err(|e| Error::Address(format!("Invalid Bech32 string: {}", e)))?;
    if variant != Variant::Bech32 {
        return Err(Error::Address("Expected Bech32 variant".to_string()));
    }
    if hrp != expected_hrp {
        return Err(Error::Address(format!(
            "Prefix mismatch: expected {}, got {}",
            expected_hrp, hrp
        )));
    }

    let (version, program) = data
        .split_first()
        .ok_or_else(|| Error::Address("Missing witness version".to_string()))?;
    if version.to_u8() != witness_version {
        return Err(Error::Address(format!(
            "Witness version mismatch: expected {}, got {}",
            witness_version,
            version.to_u8()
        )));
    }

    let program = Vec::<u8>::from_base32(program)
        .map_err(|e| Error::Address(format!("Invalid witness program: {}", e)))?;
    if program.len() != program_len {
        return Err(Error::Address(format!(
            "Witness program length mismatch: expected {}, got {}",
            program_len,
            program.len()
        )));
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let payload = [0x75u8; 20];
        let address = encode("cosmos", &payload).unwrap();
        assert!(address.starts_with("cosmos1"));
        assert_eq!(decode(&address, "cosmos", 20).unwrap(), payload);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let address = encode("zil", &[0x11u8; 20]).unwrap();
        let mut corrupted = address.into_bytes();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == b'q' { b'p' } else { b'q' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(decode(&corrupted, "zil", 20).is_err());
    }

    #[test]
    fn test_wrong_hrp_rejected() {
        // Correctly checksummed, but for another chain's prefix
        let address = encode("cosmos", &[0x22u8; 20]).unwrap();
        assert!(decode(&address, "zil", 20).is_err());
    }

    #[test]
    fn test_witness_round_trip() {
        let program = [0x42u8; 20];
        let address = encode_witness("bc", 0, &program).unwrap();
        assert!(address.starts_with("bc1q"));
        assert_eq!(decode_witness(&address, "bc", 0, 20).unwrap(), program);
    }
}
