//! Transaction signing dispatch
//!
//! Each chain owns its signing input schema and wire format behind the
//! [`CoinSigner`] trait; [`AnySigner`] only routes a coin-tagged payload to
//! the registered module and tags whatever failure it reports with the
//! originating coin. The registry is built once at first use and is
//! immutable afterwards.

pub mod cosmos;
pub mod ethereum;
pub mod rlp;
pub mod solana;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::coin::CoinType;
use crate::error::{Error, Result};

/// A chain-specific transaction signer
///
/// `input` is the chain's opaque signing input; the return value is the
/// chain's serialized signed transaction.
pub trait CoinSigner: Send + Sync {
    /// Parse the chain's signing input, sign, and serialize the result.
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>>;
}

static SIGNERS: Lazy<HashMap<CoinType, Box<dyn CoinSigner>>> = Lazy::new(|| {
    let mut table: HashMap<CoinType, Box<dyn CoinSigner>> = HashMap::new();
    table.insert(CoinType::Ethereum, Box::new(ethereum::EthereumSigner));
    table.insert(CoinType::SmartChain, Box::new(ethereum::EthereumSigner));
    table.insert(CoinType::Cosmos, Box::new(cosmos::CosmosSigner));
    table.insert(CoinType::Solana, Box::new(solana::SolanaSigner));
    tracing::debug!(signers = table.len(), "chain signer registry built");
    table
});

/// Stateless entry point routing signing requests by coin
pub struct AnySigner;

impl AnySigner {
    /// Sign a chain-tagged payload with the registered signer.
    ///
    /// Fails with [`Error::UnsupportedCoin`] before touching the payload if
    /// no signer is registered for `coin`; any failure from the chain
    /// signer itself is surfaced as [`Error::Signing`] tagged with the
    /// coin.
    pub fn sign(input: &[u8], coin: CoinType) -> Result<Vec<u8>> {
        let signer = SIGNERS.get(&coin).ok_or(Error::UnsupportedCoin(coin))?;
        tracing::debug!(%coin, input_len = input.len(), "dispatching signing request");
        signer.sign(input).map_err(|e| Error::Signing {
            coin,
            reason: e.to_string(),
        })
    }

    /// Check whether a signer module is registered for `coin`.
    pub fn supports(coin: CoinType) -> bool {
        SIGNERS.contains_key(&coin)
    }
}
