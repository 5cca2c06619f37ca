//! Cryptographic core
//!
//! Secret buffers, the curve abstraction, key material, mnemonics and
//! hierarchical deterministic derivation.

pub mod curve;
pub mod hash;
pub mod hd;
pub mod keys;
pub mod mnemonic;
pub mod secure;
