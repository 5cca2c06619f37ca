//! Coin registry
//!
//! A fixed, read-only table binding every supported chain to its curve,
//! public key form, address format and default derivation path. The table
//! is declarative data built into the binary: it never changes after
//! process start, so concurrent reads need no synchronization.

use std::fmt;

use crate::crypto::curve::{Curve, PublicKeyFormat};
use crate::error::{Error, Result};

/// Supported blockchains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CoinType {
    Bitcoin,
    Litecoin,
    Dogecoin,
    Ethereum,
    SmartChain,
    Cosmos,
    Zilliqa,
    Neo,
    Stellar,
    Solana,
    Near,
    Aeternity,
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Data placed in the payload of a Bech32 address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bech32Payload {
    /// Witness version 0 program: hash160 of the compressed public key
    WitnessV0,
    /// hash160 of the compressed public key, no witness version
    Hash160,
    /// Last 20 bytes of SHA-256 of the compressed public key
    Sha256Tail,
}

/// Data hashed into a Base58Check address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base58Payload {
    /// hash160 of the compressed public key
    PublicKeyHash,
    /// hash160 of the single-key verification script (NEO)
    VerificationScriptHash,
}

/// How a chain renders a public key as an address string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// Bech32 with a per-chain human-readable prefix
    Bech32 {
        hrp: &'static str,
        payload: Bech32Payload,
    },
    /// Base58 with a version byte and 4-byte double-SHA256 checksum
    Base58Check {
        version: u8,
        payload: Base58Payload,
    },
    /// Printable chain prefix followed by Base58Check of the raw key
    Base58Prefixed { prefix: &'static str },
    /// Keccak-256 derived, EIP-55 checksummed hex with an `0x` prefix
    KeccakHex,
    /// Stellar strkey: base32 of version byte, raw key and CRC16 checksum
    Base32Check { version: u8 },
    /// Raw Base58 of the public key
    Base58Raw,
    /// Raw lowercase hex of the public key
    RawHex,
}

/// Static metadata for one registered chain
#[derive(Debug, Clone, Copy)]
pub struct CoinInfo {
    pub coin: CoinType,
    pub name: &'static str,
    pub symbol: &'static str,
    pub curve: Curve,
    pub public_key_format: PublicKeyFormat,
    pub address_format: AddressFormat,
    pub derivation_path: &'static str,
}

static REGISTRY: &[CoinInfo] = &[
    CoinInfo {
        coin: CoinType::Bitcoin,
        name: "Bitcoin",
        symbol: "BTC",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Bech32 {
            hrp: "bc",
            payload: Bech32Payload::WitnessV0,
        },
        derivation_path: "m/84'/0'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Litecoin,
        name: "Litecoin",
        symbol: "LTC",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Base58Check {
            version: 0x30,
            payload: Base58Payload::PublicKeyHash,
        },
        derivation_path: "m/44'/2'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Dogecoin,
        name: "Dogecoin",
        symbol: "DOGE",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Base58Check {
            version: 0x1e,
            payload: Base58Payload::PublicKeyHash,
        },
        derivation_path: "m/44'/3'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Ethereum,
        name: "Ethereum",
        symbol: "ETH",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Uncompressed,
        address_format: AddressFormat::KeccakHex,
        derivation_path: "m/44'/60'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::SmartChain,
        name: "BNB Smart Chain",
        symbol: "BNB",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Uncompressed,
        address_format: AddressFormat::KeccakHex,
        derivation_path: "m/44'/60'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Cosmos,
        name: "Cosmos Hub",
        symbol: "ATOM",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Bech32 {
            hrp: "cosmos",
            payload: Bech32Payload::Hash160,
        },
        derivation_path: "m/44'/118'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Zilliqa,
        name: "Zilliqa",
        symbol: "ZIL",
        curve: Curve::Secp256k1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Bech32 {
            hrp: "zil",
            payload: Bech32Payload::Sha256Tail,
        },
        derivation_path: "m/44'/313'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Neo,
        name: "NEO",
        symbol: "NEO",
        curve: Curve::Nist256p1,
        public_key_format: PublicKeyFormat::Compressed,
        address_format: AddressFormat::Base58Check {
            version: 0x17,
            payload: Base58Payload::VerificationScriptHash,
        },
        derivation_path: "m/44'/888'/0'/0/0",
    },
    CoinInfo {
        coin: CoinType::Stellar,
        name: "Stellar",
        symbol: "XLM",
        curve: Curve::Ed25519,
        public_key_format: PublicKeyFormat::Raw,
        address_format: AddressFormat::Base32Check { version: 6 << 3 },
        derivation_path: "m/44'/148'/0'",
    },
    CoinInfo {
        coin: CoinType::Solana,
        name: "Solana",
        symbol: "SOL",
        curve: Curve::Ed25519,
        public_key_format: PublicKeyFormat::Raw,
        address_format: AddressFormat::Base58Raw,
        derivation_path: "m/44'/501'/0'",
    },
    CoinInfo {
        coin: CoinType::Near,
        name: "NEAR",
        symbol: "NEAR",
        curve: Curve::Ed25519,
        public_key_format: PublicKeyFormat::Raw,
        address_format: AddressFormat::RawHex,
        derivation_path: "m/44'/397'/0'",
    },
    CoinInfo {
        coin: CoinType::Aeternity,
        name: "Aeternity",
        symbol: "AE",
        curve: Curve::Ed25519,
        public_key_format: PublicKeyFormat::Raw,
        address_format: AddressFormat::Base58Prefixed { prefix: "ak_" },
        derivation_path: "m/44'/457'/0'/0'/0'",
    },
];

/// Get the full registry table.
pub fn registry() -> &'static [CoinInfo] {
    REGISTRY
}

/// Look up the registry entry for a coin.
///
/// The only failure mode is an unregistered coin type, surfaced as
/// [`Error::UnsupportedCoin`].
pub fn info(coin: CoinType) -> Result<&'static CoinInfo> {
    REGISTRY
        .iter()
        .find(|entry| entry.coin == coin)
        .ok_or(Error::UnsupportedCoin(coin))
}

impl CoinType {
    /// Look up this coin's registry entry.
    pub fn info(&self) -> Result<&'static CoinInfo> {
        info(*self)
    }

    /// Get the curve this coin's keys live on.
    pub fn curve(&self) -> Result<Curve> {
        Ok(self.info()?.curve)
    }

    /// Get the default derivation path for this coin.
    pub fn derivation_path(&self) -> Result<&'static str> {
        Ok(self.info()?.derivation_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_coin_is_registered() {
        for entry in registry() {
            assert_eq!(info(entry.coin).unwrap().coin, entry.coin);
        }
    }

    #[test]
    fn test_registry_paths_parse() {
        use crate::crypto::hd::DerivationPath;

        for entry in registry() {
            let path: DerivationPath = entry.derivation_path.parse().unwrap();
            if matches!(entry.curve, Curve::Ed25519) {
                assert!(
                    path.is_fully_hardened(),
                    "{} path must be fully hardened",
                    entry.name
                );
            }
        }
    }

    #[test]
    fn test_coin_metadata() {
        assert_eq!(CoinType::Stellar.curve().unwrap(), Curve::Ed25519);
        assert_eq!(CoinType::Neo.curve().unwrap(), Curve::Nist256p1);
        assert_eq!(
            CoinType::Ethereum.derivation_path().unwrap(),
            "m/44'/60'/0'/0/0"
        );
    }
}
