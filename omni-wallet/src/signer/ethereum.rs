//! Legacy EVM transaction signing
//!
//! Builds the RLP sighash, signs it with a recoverable secp256k1 signature
//! and re-encodes the transaction with the EIP-155 replay-protected `v`.
//! The output is the raw transaction bytes ready for broadcast.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::{rlp, CoinSigner};
use crate::crypto::curve::Curve;
use crate::crypto::hash;
use crate::crypto::keys::PrivateKey;
use crate::error::{Error, Result};

/// Signing input for a legacy transfer or contract call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// Chain ID for EIP-155 replay protection
    pub chain_id: u64,
    /// Nonce
    pub nonce: u64,
    /// Gas price in wei, decimal string
    pub gas_price: String,
    /// Gas limit, decimal string
    pub gas_limit: String,
    /// Recipient, 0x-prefixed hex
    pub to: String,
    /// Value in wei, decimal string
    pub value: String,
    /// Call data, 0x-prefixed hex
    #[serde(default)]
    pub data: String,
    /// Private key, hex
    pub private_key: String,
}

/// Signer for Ethereum and the EVM-compatible chains
pub struct EthereumSigner;

impl CoinSigner for EthereumSigner {
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let input: SigningInput = serde_json::from_slice(input)
            .map_err(|e| Error::InvalidInput(format!("Invalid signing input: {}", e)))?;

        let to = parse_address(&input.to)?;
        let gas_price = parse_amount("gas_price", &input.gas_price)?;
        let gas_limit = parse_amount("gas_limit", &input.gas_limit)?;
        let value = parse_amount("value", &input.value)?;
        let data = parse_hex(input.data.trim_start_matches("0x"))?;

        let mut key_bytes = parse_hex(input.private_key.trim_start_matches("0x"))?;
        let key = PrivateKey::from_slice(&key_bytes, Curve::Secp256k1);
        key_bytes.zeroize();
        let key = key?;

        // Sighash covers the unsigned fields plus (chain_id, 0, 0)
        let unsigned = [
            rlp::encode_uint(input.nonce as u128),
            rlp::encode_uint(gas_price),
            rlp::encode_uint(gas_limit),
            rlp::encode_item(&to),
            rlp::encode_uint(value),
            rlp::encode_item(&data),
            rlp::encode_uint(input.chain_id as u128),
            rlp::encode_uint(0),
            rlp::encode_uint(0),
        ];
        let sighash = hash::keccak256(&rlp::encode_list(&unsigned));

        let signature = key.sign(&sighash, Curve::Secp256k1)?;
        let v = signature[64] as u64 + 35 + 2 * input.chain_id;

        let signed = [
            rlp::encode_uint(input.nonce as u128),
            rlp::encode_uint(gas_price),
            rlp::encode_uint(gas_limit),
            rlp::encode_item(&to),
            rlp::encode_uint(value),
            rlp::encode_item(&data),
            rlp::encode_uint(v as u128),
            rlp::encode_uint_bytes(&signature[..32]),
            rlp::encode_uint_bytes(&signature[32..64]),
        ];
        Ok(rlp::encode_list(&signed))
    }
}

fn parse_address(address: &str) -> Result<Vec<u8>> {
    let body = address
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidInput("Recipient must be 0x-prefixed".to_string()))?;
    let bytes = parse_hex(body)?;
    if bytes.len() != 20 {
        return Err(Error::InvalidInput(format!(
            "Recipient must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn parse_amount(field: &str, value: &str) -> Result<u128> {
    value
        .parse::<u128>()
        .map_err(|e| Error::InvalidInput(format!("Invalid {}: {}", field, e)))
}

fn parse_hex(value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| Error::InvalidInput(format!("Invalid hex: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_input() -> SigningInput {
        SigningInput {
            chain_id: 1,
            nonce: 9,
            gas_price: "20000000000".to_string(),
            gas_limit: "21000".to_string(),
            to: "0x3535353535353535353535353535353535353535".to_string(),
            value: "1000000000000000000".to_string(),
            data: String::new(),
            private_key: "4646464646464646464646464646464646464646464646464646464646464646"
                .to_string(),
        }
    }

    #[test]
    fn test_eip155_reference_transaction() {
        // The worked example from the EIP-155 specification
        let input = serde_json::to_vec(&transfer_input()).unwrap();
        let encoded = EthereumSigner.sign(&input).unwrap();
        assert_eq!(
            hex::encode(encoded),
            "f86c098504a817c800825208943535353535353535353535353535353535353535880d\
             e0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1\
             590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1\
             966a3b6d83"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let input = serde_json::to_vec(&transfer_input()).unwrap();
        assert_eq!(
            EthereumSigner.sign(&input).unwrap(),
            EthereumSigner.sign(&input).unwrap()
        );
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(EthereumSigner.sign(b"not json").is_err());

        let mut bad = transfer_input();
        bad.to = "0x1234".to_string();
        assert!(EthereumSigner
            .sign(&serde_json::to_vec(&bad).unwrap())
            .is_err());

        let mut bad = transfer_input();
        bad.value = "one wei".to_string();
        assert!(EthereumSigner
            .sign(&serde_json::to_vec(&bad).unwrap())
            .is_err());
    }
}
