//! Omni Wallet Core - multi-chain key derivation, addressing and signing
//!
//! This library provides the key-material and dispatch layer of a
//! multi-blockchain wallet: curve-polymorphic private/public keys with
//! secure erasure, hierarchical deterministic derivation from a mnemonic,
//! a read-only coin registry, and the AnySigner/AnyAddress entry points
//! that route coin-tagged requests to chain-specific codecs and signers.
//!
//! All operations are synchronous, CPU-bound and deterministic: identical
//! inputs always produce identical keys, addresses and signatures.

pub mod address;
pub mod coin;
pub mod crypto;
pub mod error;
pub mod signer;

// Re-export commonly used types for convenience
pub use address::AnyAddress;
pub use coin::CoinType;
pub use crypto::curve::{Curve, PublicKeyFormat};
pub use crypto::hd::{DerivationPath, HdNode, HdWallet};
pub use crypto::keys::{PrivateKey, PublicKey};
pub use error::{Error, Result};
pub use signer::AnySigner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
