//! Hierarchical deterministic key derivation
//!
//! BIP-32 derivation for the ECDSA curves and SLIP-0010 hardened-only
//! derivation for the 25519 curves, from a BIP-39 mnemonic seed. Identical
//! (seed, path) inputs always produce an identical leaf key.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::coin::{self, CoinType};
use crate::crypto::curve::{Curve, PublicKeyFormat};
use crate::crypto::keys::PrivateKey;
use crate::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, MnemonicStrength};
use crate::crypto::secure::SecureBytes;
use crate::crypto::hash;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Bit marking a child index as hardened
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// A parsed BIP-32 derivation path such as `m/44'/60'/0'/0/0`
///
/// Hardened components carry [`HARDENED_BIT`] in their index. The textual
/// form accepts `'` or `h` as the hardened marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    indices: Vec<u32>,
}

impl DerivationPath {
    /// Get the child indices from the master node down.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Check whether every component is hardened, as the 25519 curves
    /// require.
    pub fn is_fully_hardened(&self) -> bool {
        self.indices.iter().all(|i| i & HARDENED_BIT != 0)
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix('m')
            .ok_or_else(|| Error::InvalidInput(format!("Invalid derivation path: {}", path)))?;

        let mut indices = Vec::new();
        for component in rest.split('/') {
            if component.is_empty() {
                continue;
            }

            let hardened = component.ends_with('\'') || component.ends_with('h');
            let digits = if hardened {
                &component[..component.len() - 1]
            } else {
                component
            };
            let index = digits.parse::<u32>().map_err(|_| {
                Error::InvalidInput(format!("Invalid derivation path component: {}", component))
            })?;
            if index >= HARDENED_BIT {
                return Err(Error::InvalidInput(format!(
                    "Derivation index out of range: {}",
                    component
                )));
            }

            indices.push(if hardened { index | HARDENED_BIT } else { index });
        }

        Ok(Self { indices })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.indices {
            if index & HARDENED_BIT != 0 {
                write!(f, "/{}'", index & !HARDENED_BIT)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// One node of the derivation tree
///
/// Immutable once computed; consumed only to produce child nodes or a
/// terminal [`PrivateKey`]. Key and chain code are wiped on drop.
pub struct HdNode {
    key: [u8; 32],
    chain_code: [u8; 32],
    depth: u8,
    child_index: u32,
    parent_fingerprint: [u8; 4],
    curve: Curve,
}

impl HdNode {
    /// Build the master node for `curve` from a seed.
    ///
    /// Uses the per-curve SLIP-0010 HMAC key; for the ECDSA curves an
    /// out-of-range master scalar re-feeds the HMAC until a valid one
    /// appears.
    pub fn master(seed: &[u8], curve: Curve) -> Result<Self> {
        let hmac_key: &[u8] = match curve {
            Curve::Secp256k1 => b"Bitcoin seed",
            Curve::Nist256p1 => b"Nist256p1 seed",
            Curve::Ed25519 => b"ed25519 seed",
            Curve::Curve25519 => b"curve25519 seed",
        };

        let mut digest = hmac_sha512(hmac_key, seed)?;
        loop {
            let needs_retry = matches!(curve, Curve::Secp256k1 | Curve::Nist256p1)
                && !curve.is_valid_key(&digest[..32]);
            if needs_retry {
                // SLIP-0010: out-of-range master scalar, re-feed the HMAC
                digest = hmac_sha512(hmac_key, &digest)?;
                continue;
            }

            let (key, chain_code) = split_digest(&mut digest);
            return Ok(Self {
                key,
                chain_code,
                depth: 0,
                child_index: 0,
                parent_fingerprint: [0u8; 4],
                curve,
            });
        }
    }

    /// Derive the child node at `index` (hardened if [`HARDENED_BIT`] is
    /// set).
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let hardened = index & HARDENED_BIT != 0;

        let mut data = Vec::with_capacity(37);
        match self.curve {
            Curve::Ed25519 | Curve::Curve25519 => {
                if !hardened {
                    return Err(Error::KeyDerivation(format!(
                        "{:?} derivation requires hardened indices",
                        self.curve
                    )));
                }
                data.push(0);
                data.extend_from_slice(&self.key);
            }
            Curve::Secp256k1 | Curve::Nist256p1 => {
                if hardened {
                    data.push(0);
                    data.extend_from_slice(&self.key);
                } else {
                    data.extend_from_slice(&self.public_key_bytes()?);
                }
            }
        }
        data.extend_from_slice(&index.to_be_bytes());

        let (key, chain_code) = match self.curve {
            Curve::Ed25519 | Curve::Curve25519 => {
                let mut digest = hmac_sha512(&self.chain_code, &data)?;
                data.zeroize();
                split_digest(&mut digest)
            }
            curve => self.derive_ecdsa_child(curve, data, index)?,
        };

        Ok(Self {
            key,
            chain_code,
            depth: self.depth.wrapping_add(1),
            child_index: index,
            parent_fingerprint: self.fingerprint()?,
            curve: self.curve,
        })
    }

    /// Walk `path` from this node and return the final node.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        match path.indices().split_first() {
            None => Ok(Self {
                key: self.key,
                chain_code: self.chain_code,
                depth: self.depth,
                child_index: self.child_index,
                parent_fingerprint: self.parent_fingerprint,
                curve: self.curve,
            }),
            Some((first, rest)) => {
                let mut node = self.derive_child(*first)?;
                for index in rest {
                    node = node.derive_child(*index)?;
                }
                Ok(node)
            }
        }
    }

    /// BIP-32 child key step with the SLIP-0010 retry on an out-of-range
    /// scalar or zero child key.
    fn derive_ecdsa_child(
        &self,
        curve: Curve,
        mut data: Vec<u8>,
        index: u32,
    ) -> Result<([u8; 32], [u8; 32])> {
        loop {
            let mut digest = hmac_sha512(&self.chain_code, &data)?;
            let (tweak, chain_code) = split_digest(&mut digest);

            if let Some(child) = add_scalars(curve, &self.key, &tweak)? {
                data.zeroize();
                return Ok((child, chain_code));
            }

            // SLIP-0010: retry with 0x01 || IR || ser32(i)
            data.zeroize();
            data = Vec::with_capacity(37);
            data.push(1);
            data.extend_from_slice(&chain_code);
            data.extend_from_slice(&index.to_be_bytes());
        }
    }

    /// Build the terminal private key for this node.
    pub fn private_key(&self) -> Result<PrivateKey> {
        PrivateKey::from_slice(&self.key, self.curve)
    }

    /// Get the chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Get the depth below the master node.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Get the index this node was derived at.
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// Get the first four bytes of the parent key's identifier.
    pub fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// Get the curve this node derives keys for.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    fn public_key_bytes(&self) -> Result<Vec<u8>> {
        let format = match self.curve {
            Curve::Secp256k1 | Curve::Nist256p1 => PublicKeyFormat::Compressed,
            _ => PublicKeyFormat::Raw,
        };
        self.curve.public_key(&self.key, format)
    }

    fn fingerprint(&self) -> Result<[u8; 4]> {
        // SLIP-0010 identifier: hash160 of serP, where the 25519 curves
        // serialize as 0x00 || raw key
        let serialized = match self.curve {
            Curve::Secp256k1 | Curve::Nist256p1 => self.public_key_bytes()?,
            _ => {
                let mut bytes = vec![0u8];
                bytes.extend_from_slice(&self.public_key_bytes()?);
                bytes
            }
        };
        let id = hash::hash160(&serialized);
        Ok([id[0], id[1], id[2], id[3]])
    }
}

impl Drop for HdNode {
    fn drop(&mut self) {
        self.key.zeroize();
        self.chain_code.zeroize();
    }
}

impl fmt::Debug for HdNode {
    /// Never prints key material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdNode")
            .field("curve", &self.curve)
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .finish()
    }
}

/// A hierarchical deterministic wallet over an immutable seed
///
/// Holds no mutable session state; a single instance can serve repeated
/// derivation calls, including concurrently from multiple threads.
pub struct HdWallet {
    seed: SecureBytes,
}

impl HdWallet {
    /// Create a wallet from a mnemonic phrase and passphrase.
    ///
    /// The phrase is validated against the BIP-39 wordlist and checksum
    /// before the seed is stretched.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self> {
        let seed = mnemonic_to_seed(phrase, Some(passphrase))?;
        tracing::debug!(
            word_count = phrase.split_whitespace().count(),
            "created wallet from mnemonic"
        );
        Ok(Self { seed })
    }

    /// Create a wallet with a freshly generated mnemonic, returning the
    /// phrase for the caller to back up.
    pub fn generate(strength: MnemonicStrength, passphrase: &str) -> Result<(Self, String)> {
        let mnemonic = generate_mnemonic(strength)?;
        let wallet = Self::from_mnemonic(&mnemonic, passphrase)?;
        Ok((wallet, mnemonic))
    }

    /// Create a wallet directly from seed entropy of 16 to 64 bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(Error::InvalidInput(format!(
                "Seed must be 16..=64 bytes, got {}",
                seed.len()
            )));
        }
        Ok(Self {
            seed: SecureBytes::from_slice(seed),
        })
    }

    /// Build the master node for `curve`.
    pub fn master_node(&self, curve: Curve) -> Result<HdNode> {
        HdNode::master(self.seed.as_slice(), curve)
    }

    /// Derive the node at `path` for `curve`.
    pub fn derive_node(&self, curve: Curve, path: &DerivationPath) -> Result<HdNode> {
        self.master_node(curve)?.derive_path(path)
    }

    /// Derive the leaf private key at `path` for `curve`.
    pub fn derive(&self, curve: Curve, path: &DerivationPath) -> Result<PrivateKey> {
        self.derive_node(curve, path)?.private_key()
    }

    /// Derive the leaf private key for a coin's registered default path.
    ///
    /// Fails only if the coin type has no registry entry.
    pub fn get_key_for_coin(&self, coin: CoinType) -> Result<PrivateKey> {
        let info = coin::info(coin)?;
        let path: DerivationPath = info.derivation_path.parse()?;
        self.derive(info.curve, &path)
    }

    /// Derive the canonical address for a coin's registered default path.
    pub fn get_address_for_coin(&self, coin: CoinType) -> Result<String> {
        let key = self.get_key_for_coin(coin)?;
        let public_key = key.public_key()?;
        Ok(crate::address::AnyAddress::with_public_key(&public_key, coin)?.into_string())
    }
}

impl fmt::Debug for HdWallet {
    /// Never prints the seed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HdWallet")
    }
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
    mac.update(data);

    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Split an HMAC-SHA512 digest into (IL, IR), wiping the source buffer.
fn split_digest(digest: &mut [u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&digest[..32]);
    right.copy_from_slice(&digest[32..]);
    digest.zeroize();
    (left, right)
}

/// Compute `(parent + tweak) mod n` for an ECDSA curve.
///
/// Returns `None` when SLIP-0010 requires the retry step: the tweak is at
/// or above the group order, or the child scalar is zero.
fn add_scalars(curve: Curve, parent: &[u8; 32], tweak: &[u8; 32]) -> Result<Option<[u8; 32]>> {
    match curve {
        Curve::Secp256k1 => {
            let parent_key = secp256k1::SecretKey::from_slice(parent)
                .map_err(|e| Error::KeyDerivation(format!("Invalid parent key: {}", e)))?;
            let scalar = match secp256k1::Scalar::from_be_bytes(*tweak) {
                Ok(scalar) => scalar,
                Err(_) => return Ok(None),
            };
            match parent_key.add_tweak(&scalar) {
                Ok(child) => Ok(Some(child.secret_bytes())),
                Err(_) => Ok(None),
            }
        }
        Curve::Nist256p1 => {
            use p256::elliptic_curve::{Field, PrimeField};

            let parent_repr = p256::FieldBytes::clone_from_slice(parent);
            let parent_scalar = Option::<p256::Scalar>::from(p256::Scalar::from_repr(parent_repr))
                .ok_or_else(|| Error::KeyDerivation("Invalid parent key".to_string()))?;

            let tweak_repr = p256::FieldBytes::clone_from_slice(tweak);
            let tweak_scalar = match Option::<p256::Scalar>::from(p256::Scalar::from_repr(tweak_repr))
            {
                Some(scalar) => scalar,
                None => return Ok(None),
            };

            let child = parent_scalar + tweak_scalar;
            if bool::from(child.is_zero()) {
                return Ok(None);
            }
            Ok(Some(child.to_repr().into()))
        }
        _ => Err(Error::KeyDerivation(format!(
            "{:?} has no scalar addition step",
            curve
        ))),
    }
}
