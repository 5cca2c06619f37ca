//! Error types for the wallet core

use thiserror::Error;

use crate::coin::CoinType;
use crate::crypto::curve::Curve;

/// Custom error type for wallet core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Curve mismatch: key is {expected:?}, request was for {requested:?}")]
    CurveMismatch { expected: Curve, requested: Curve },

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Unsupported coin: {0}")]
    UnsupportedCoin(CoinType),

    #[error("Address error: {0}")]
    Address(String),

    #[error("{coin} signer rejected input: {reason}")]
    Signing { coin: CoinType, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for wallet core operations
pub type Result<T> = std::result::Result<T, Error>;
