//! Stellar strkey encoding: base32 over a version byte, the raw key and a
//! CRC16-XMODEM checksum stored little-endian

use crate::error::{Error, Result};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encode a raw 32-byte key under the given strkey version byte.
pub fn encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 3);
    data.push(version);
    data.extend_from_slice(payload);
    let crc = crc16_xmodem(&data);
    data.push((crc & 0xff) as u8);
    data.push((crc >> 8) as u8);
    base32_encode(&data)
}

/// Decode a strkey, verifying checksum, version byte and key length.
pub fn decode(address: &str, version: u8) -> Result<Vec<u8>> {
    let data = base32_decode(address)?;
    if data.len() != 35 {
        return Err(Error::Address(format!(
            "Address length mismatch: expected 35 bytes, got {}",
            data.len()
        )));
    }

    let (body, checksum) = data.split_at(33);
    let crc = crc16_xmodem(body);
    if checksum != [(crc & 0xff) as u8, (crc >> 8) as u8] {
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

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

fn base32_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for ch in encoded.bytes() {
        let value = ALPHABET
            .iter()
            .position(|&a| a == ch)
            .ok_or_else(|| Error::Address(format!("Invalid base32 character: {}", ch as char)))?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
        }
    }
    // Leftover bits are padding and must be zero
    if bits > 0 && buffer & ((1u32 << bits) - 1) != 0 {
        return Err(Error::Address("Invalid base32 padding".to_string()));
    }
    Ok(out)
}

fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    // Account version byte: 'G' rows of the strkey table
    const VERSION: u8 = 6 << 3;

    #[test]
    fn test_known_account_round_trips() {
        // Stellar foundation example account
        let key = hex::decode("3b9f4b1b2e2dfa44a3b7a77c6a8a1dce7b3b8e2a14a6b6b86a0a6b52a3b3a844")
            .unwrap();
        let address = encode(VERSION, &key);
        assert_eq!(address.len(), 56);
        assert!(address.starts_with('G'));
        assert_eq!(decode(&address, VERSION).unwrap(), key);
    }

    #[test]
    fn test_corrupted_character_rejected() {
        let address = encode(VERSION, &[0x21u8; 32]);
        let mut corrupted = address.into_bytes();
        corrupted[30] = if corrupted[30] == b'A' { b'B' } else { b'A' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(decode(&corrupted, VERSION).is_err());
    }

    #[test]
    fn test_wrong_version_rejected() {
        // Valid checksum under the seed version byte ('S'), checked as account
        let seed_version = 18 << 3;
        let address = encode(seed_version, &[0x21u8; 32]);
        assert!(decode(&address, VERSION).is_err());
    }

    #[test]
    fn test_invalid_alphabet_rejected() {
        assert!(decode("not-a-strkey!", VERSION).is_err());
    }
}
