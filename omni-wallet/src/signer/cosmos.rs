//! Cosmos SDK transaction signing
//!
//! Signs the canonical JSON sign doc (keys sorted, no whitespace) with
//! SHA-256 and a compact secp256k1 signature, and returns the amino-style
//! broadcast envelope with base64 signature material.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroize;

use super::CoinSigner;
use crate::crypto::curve::Curve;
use crate::crypto::hash;
use crate::crypto::keys::PrivateKey;
use crate::error::{Error, Result};

/// Signing input for a Cosmos SDK transaction
///
/// `fee` and `msgs` are chain-defined JSON documents passed through into
/// the sign doc untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    pub account_number: String,
    pub chain_id: String,
    pub sequence: String,
    pub fee: serde_json::Value,
    #[serde(default)]
    pub memo: String,
    pub msgs: Vec<serde_json::Value>,
    /// Private key, hex
    pub private_key: String,
}

/// Signer for Cosmos SDK chains
pub struct CosmosSigner;

impl CoinSigner for CosmosSigner {
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let input: SigningInput = serde_json::from_slice(input)
            .map_err(|e| Error::InvalidInput(format!("Invalid signing input: {}", e)))?;

        let mut key_bytes = hex::decode(input.private_key.trim_start_matches("0x"))
            .map_err(|e| Error::InvalidInput(format!("Invalid hex: {}", e)))?;
        let key = PrivateKey::from_slice(&key_bytes, Curve::Secp256k1);
        key_bytes.zeroize();
        let key = key?;

        // serde_json maps are ordered, which yields the canonical sorted form
        let sign_doc = json!({
            "account_number": input.account_number,
            "chain_id": input.chain_id,
            "fee": input.fee,
            "memo": input.memo,
            "msgs": input.msgs,
            "sequence": input.sequence,
        });
        let sign_doc_bytes = serde_json::to_vec(&sign_doc)
            .map_err(|e| Error::InvalidInput(format!("Sign doc serialization failed: {}", e)))?;
        let digest = hash::sha256(&sign_doc_bytes);

        // Compact (r, s) without the recovery id
        let signature = key.sign(&digest, Curve::Secp256k1)?;
        let public_key = key.public_key()?;

        let engine = base64::engine::general_purpose::STANDARD;
        let envelope = json!({
            "mode": "sync",
            "tx": {
                "fee": input.fee,
                "memo": input.memo,
                "msg": input.msgs,
                "signatures": [{
                    "pub_key": {
                        "type": "tendermint/PubKeySecp256k1",
                        "value": engine.encode(public_key.as_bytes()),
                    },
                    "signature": engine.encode(&signature[..64]),
                }],
            },
        });
        serde_json::to_vec(&envelope)
            .map_err(|e| Error::InvalidInput(format!("Envelope serialization failed: {}", e)))
    }
}
