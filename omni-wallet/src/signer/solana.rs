//! Solana transaction signing
//!
//! Builds the legacy wire-format message for a system-program transfer,
//! signs the message bytes with ed25519 and returns the serialized signed
//! transaction.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::CoinSigner;
use crate::crypto::curve::Curve;
use crate::crypto::keys::PrivateKey;
use crate::error::{Error, Result};

/// System program id: 32 zero bytes
const SYSTEM_PROGRAM: [u8; 32] = [0u8; 32];
/// System program instruction index for a transfer
const TRANSFER_INDEX: u32 = 2;

/// Signing input for a system-program transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// Recipient account, base58
    pub to: String,
    /// Amount in lamports
    pub lamports: u64,
    /// Recent blockhash, base58
    pub recent_blockhash: String,
    /// Private key, hex
    pub private_key: String,
}

/// Signer for Solana
pub struct SolanaSigner;

impl CoinSigner for SolanaSigner {
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let input: SigningInput = serde_json::from_slice(input)
            .map_err(|e| Error::InvalidInput(format!("Invalid signing input: {}", e)))?;

        let mut key_bytes = hex::decode(input.private_key.trim_start_matches("0x"))
            .map_err(|e| Error::InvalidInput(format!("Invalid hex: {}", e)))?;
        let key = PrivateKey::from_slice(&key_bytes, Curve::Ed25519);
        key_bytes.zeroize();
        let key = key?;

        let from = key.public_key()?;
        let to = decode_pubkey("to", &input.to)?;
        let blockhash = decode_pubkey("recent_blockhash", &input.recent_blockhash)?;

        let message = build_transfer_message(from.as_bytes(), &to, &blockhash, input.lamports);
        let signature = key.sign(&message, Curve::Ed25519)?;

        // Wire transaction: compact signature array followed by the message
        let mut transaction = Vec::with_capacity(1 + 64 + message.len());
        append_compact_u16(&mut transaction, 1);
        transaction.extend_from_slice(&signature);
        transaction.extend_from_slice(&message);
        Ok(transaction)
    }
}

fn build_transfer_message(from: &[u8], to: &[u8; 32], blockhash: &[u8; 32], lamports: u64) -> Vec<u8> {
    let mut message = Vec::with_capacity(3 + 1 + 96 + 32 + 16);

    // Header: one writable signer, no readonly signers, one readonly program
    message.push(1);
    message.push(0);
    message.push(1);

    // Account keys: payer, recipient, system program
    append_compact_u16(&mut message, 3);
    message.extend_from_slice(from);
    message.extend_from_slice(to);
    message.extend_from_slice(&SYSTEM_PROGRAM);

    message.extend_from_slice(blockhash);

    // Single transfer instruction
    append_compact_u16(&mut message, 1);
    message.push(2); // program id index
    append_compact_u16(&mut message, 2);
    message.push(0);
    message.push(1);
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    append_compact_u16(&mut message, data.len() as u16);
    message.extend_from_slice(&data);

    message
}

fn decode_pubkey(field: &str, encoded: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::InvalidInput(format!("Invalid {}: {}", field, e)))?;
    bytes
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("{} must be 32 bytes", field)))
}

/// Solana's compact-u16 length encoding
fn append_compact_u16(out: &mut Vec<u8>, mut value: u16) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}
