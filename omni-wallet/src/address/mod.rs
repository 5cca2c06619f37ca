//! Address encoding and validation
//!
//! [`AnyAddress`] resolves a coin's registry entry and routes to the codec
//! for its configured format. Validation never panics: any checksum,
//! length or prefix mismatch is an ordinary failure result.

mod base58;
mod bech32;
mod ethereum;
mod stellar;

use std::fmt;

use crate::coin::{self, AddressFormat, Base58Payload, Bech32Payload, CoinInfo, CoinType};
use crate::crypto::hash;
use crate::crypto::keys::PublicKey;
use crate::error::{Error, Result};

/// A validated address for a specific coin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyAddress {
    coin: CoinType,
    address: String,
}

impl AnyAddress {
    /// Derive the canonical address for `public_key` on `coin`.
    ///
    /// The key's curve must match the coin's registered curve; the key is
    /// re-serialized into the coin's preferred form where needed.
    pub fn with_public_key(public_key: &PublicKey, coin: CoinType) -> Result<Self> {
        let info = coin::info(coin)?;
        if public_key.curve() != info.curve {
            return Err(Error::CurveMismatch {
                expected: info.curve,
                requested: public_key.curve(),
            });
        }
        let address = encode(public_key, info)?;
        Ok(Self { coin, address })
    }

    /// Parse and validate an address string for `coin`.
    pub fn from_string(address: &str, coin: CoinType) -> Result<Self> {
        let info = coin::info(coin)?;
        validate(address, info)?;
        Ok(Self {
            coin,
            address: address.to_string(),
        })
    }

    /// Check an address string for `coin` without reporting the reason for
    /// rejection. Never panics.
    pub fn is_valid(address: &str, coin: CoinType) -> bool {
        match coin::info(coin) {
            Ok(info) => validate(address, info).is_ok(),
            Err(_) => false,
        }
    }

    /// Get the coin this address belongs to.
    pub fn coin(&self) -> CoinType {
        self.coin
    }

    /// Get the address string.
    pub fn description(&self) -> &str {
        &self.address
    }

    /// Consume the value, returning the address string.
    pub fn into_string(self) -> String {
        self.address
    }
}

impl fmt::Display for AnyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

fn encode(public_key: &PublicKey, info: &CoinInfo) -> Result<String> {
    match info.address_format {
        AddressFormat::Bech32 { hrp, payload } => {
            let data = bech32_payload(public_key, payload)?;
            match payload {
                Bech32Payload::WitnessV0 => bech32::encode_witness(hrp, 0, &data),
                _ => bech32::encode(hrp, &data),
            }
        }
        AddressFormat::Base58Check { version, payload } => {
            let data = base58_payload(public_key, payload)?;
            Ok(base58::encode_check(version, &data))
        }
        AddressFormat::Base58Prefixed { prefix } => {
            Ok(base58::encode_prefixed(prefix, public_key.as_bytes()))
        }
        AddressFormat::KeccakHex => ethereum::encode(public_key.uncompressed()?.as_bytes()),
        AddressFormat::Base32Check { version } => {
            Ok(stellar::encode(version, public_key.as_bytes()))
        }
        AddressFormat::Base58Raw => Ok(bs58::encode(public_key.as_bytes()).into_string()),
        AddressFormat::RawHex => Ok(hex::encode(public_key.as_bytes())),
    }
}

fn bech32_payload(public_key: &PublicKey, payload: Bech32Payload) -> Result<Vec<u8>> {
    let compressed = public_key.compressed()?;
    Ok(match payload {
        Bech32Payload::WitnessV0 | Bech32Payload::Hash160 => {
            hash::hash160(compressed.as_bytes()).to_vec()
        }
        Bech32Payload::Sha256Tail => hash::sha256(compressed.as_bytes())[12..].to_vec(),
    })
}

fn base58_payload(public_key: &PublicKey, payload: Base58Payload) -> Result<Vec<u8>> {
    let compressed = public_key.compressed()?;
    Ok(match payload {
        Base58Payload::PublicKeyHash => hash::hash160(compressed.as_bytes()).to_vec(),
        Base58Payload::VerificationScriptHash => {
            // Single-key verification script: PUSH33 <key> CHECKSIG
            let mut script = Vec::with_capacity(35);
            script.push(0x21);
            script.extend_from_slice(compressed.as_bytes());
            script.push(0xac);
            hash::hash160(&script).to_vec()
        }
    })
}

fn validate(address: &str, info: &CoinInfo) -> Result<()> {
    match info.address_format {
        AddressFormat::Bech32 { hrp, payload } => match payload {
            Bech32Payload::WitnessV0 => bech32::decode_witness(address, hrp, 0, 20).map(|_| ()),
            _ => bech32::decode(address, hrp, 20).map(|_| ()),
        },
        AddressFormat::Base58Check { version, .. } => {
            base58::decode_check(address, version, 20).map(|_| ())
        }
        AddressFormat::Base58Prefixed { prefix } => {
            base58::decode_prefixed(address, prefix, 32).map(|_| ())
        }
        AddressFormat::KeccakHex => ethereum::validate(address),
        AddressFormat::Base32Check { version } => stellar::decode(address, version).map(|_| ()),
        AddressFormat::Base58Raw => {
            let bytes = bs58::decode(address)
                .into_vec()
                .map_err(|e| Error::Address(format!("Invalid Base58 string: {}", e)))?;
            if bytes.len() != 32 {
                return Err(Error::Address(format!(
                    "Expected 32 key bytes, got {}",
                    bytes.len()
                )));
            }
            Ok(())
        }
        AddressFormat::RawHex => {
            let valid = address.len() == 64
                && address
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
            if !valid {
                return Err(Error::Address(
                    "Expected 64 lowercase hex characters".to_string(),
                ));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::Curve;
    use crate::crypto::keys::PrivateKey;

    const KEY: &str = "afeefca74d9a325cf1d6b6911d61a65c32afa8e02bd5e78e2e4ac2910bab45f5";

    fn public_key(curve: Curve) -> PublicKey {
        PrivateKey::from_slice(&hex::decode(KEY).unwrap(), curve)
            .unwrap()
            .public_key()
            .unwrap()
    }

    #[test]
    fn test_addresses_are_deterministic() {
        let pk = public_key(Curve::Secp256k1);
        let first = AnyAddress::with_public_key(&pk, CoinType::Ethereum).unwrap();
        let second = AnyAddress::with_public_key(&pk, CoinType::Ethereum).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_registered_coin_encodes_and_validates() {
        for entry in coin::registry() {
            let pk = public_key(entry.curve);
            let address = AnyAddress::with_public_key(&pk, entry.coin).unwrap();
            assert!(
                AnyAddress::is_valid(address.description(), entry.coin),
                "{} rejected its own address {}",
                entry.name,
                address
            );
        }
    }

    #[test]
    fn test_curve_mismatch_rejected() {
        let pk = public_key(Curve::Ed25519);
        assert!(matches!(
            AnyAddress::with_public_key(&pk, CoinType::Bitcoin),
            Err(Error::CurveMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_chain_address_rejected() {
        let pk = public_key(Curve::Secp256k1);
        let cosmos = AnyAddress::with_public_key(&pk, CoinType::Cosmos).unwrap();
        // Correct checksum, wrong human-readable prefix for Zilliqa
        assert!(!AnyAddress::is_valid(cosmos.description(), CoinType::Zilliqa));
    }

    #[test]
    fn test_validation_never_panics_on_garbage() {
        for garbage in ["", "0x", "x", "ak_", "bc1", "не адрес", "GABC"] {
            for entry in coin::registry() {
                let _ = AnyAddress::is_valid(garbage, entry.coin);
            }
        }
    }
}
