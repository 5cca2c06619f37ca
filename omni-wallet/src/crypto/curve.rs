//! Elliptic curve abstraction
//!
//! The closed set of curve systems used by the supported chains, with
//! scalar validation, public key derivation and signing resolved through a
//! single dispatch per operation. All ECDSA signing uses RFC 6979
//! deterministic nonces, so identical (key, digest) inputs always produce
//! identical signatures.

use ed25519_dalek::Signer as _;
use secp256k1::{Message, Secp256k1, SecretKey};

use crate::error::{Error, Result};

/// Supported curve systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Curve {
    /// ECDSA over the Koblitz curve used by Bitcoin and the EVM chains
    Secp256k1,
    /// ECDSA over NIST P-256, used by NEO
    Nist256p1,
    /// EdDSA over edwards25519, used by Stellar, Solana, NEAR and Aeternity
    Ed25519,
    /// X25519 key agreement; holds keys but cannot sign
    Curve25519,
}

/// Serialization form of a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PublicKeyFormat {
    /// 33-byte SEC1 compressed point (ECDSA curves)
    Compressed,
    /// 65-byte SEC1 uncompressed point (ECDSA curves)
    Uncompressed,
    /// 32-byte raw value (ed25519 / curve25519)
    Raw,
}

impl Curve {
    /// Private scalar size in bytes, identical for every supported curve.
    pub const SCALAR_SIZE: usize = 32;

    /// Check whether `bytes` is a usable private key for this curve.
    ///
    /// ECDSA curves require a scalar in `[1, order)`. The 25519 curves clamp
    /// internally and accept any 32 bytes, except the all-zero buffer which
    /// is rejected everywhere.
    pub fn is_valid_key(&self, bytes: &[u8]) -> bool {
        if bytes.len() != Self::SCALAR_SIZE || bytes.iter().all(|b| *b == 0) {
            return false;
        }
        match self {
            Curve::Secp256k1 => SecretKey::from_slice(bytes).is_ok(),
            Curve::Nist256p1 => {
                let repr = p256::FieldBytes::clone_from_slice(bytes);
                bool::from(p256::NonZeroScalar::from_repr(repr).is_some())
            }
            Curve::Ed25519 | Curve::Curve25519 => true,
        }
    }

    /// Derive the public key for `private_key` in the requested format.
    ///
    /// Pure and deterministic. The 25519 curves only have the raw form and
    /// ignore a compressed/uncompressed request in favor of it.
    pub fn public_key(&self, private_key: &[u8], format: PublicKeyFormat) -> Result<Vec<u8>> {
        match self {
            Curve::Secp256k1 => {
                let secp = Secp256k1::new();
                let secret_key = SecretKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 key: {}", e)))?;
                let public_key = secp256k1::PublicKey::from_secret_key(&secp, &secret_key);
                Ok(match format {
                    PublicKeyFormat::Uncompressed => public_key.serialize_uncompressed().to_vec(),
                    _ => public_key.serialize().to_vec(),
                })
            }
            Curve::Nist256p1 => {
                let signing_key = p256::ecdsa::SigningKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid nist256p1 key: {}", e)))?;
                let compress = !matches!(format, PublicKeyFormat::Uncompressed);
                let point = signing_key.verifying_key().to_encoded_point(compress);
                Ok(point.as_bytes().to_vec())
            }
            Curve::Ed25519 => {
                let signing_key = ed25519_dalek::SigningKey::from_bytes(&scalar_array(private_key)?);
                Ok(signing_key.verifying_key().to_bytes().to_vec())
            }
            Curve::Curve25519 => {
                let secret = x25519_dalek::StaticSecret::from(scalar_array(private_key)?);
                Ok(x25519_dalek::PublicKey::from(&secret).to_bytes().to_vec())
            }
        }
    }

    /// Sign `digest` with `private_key`.
    ///
    /// ECDSA curves take a 32-byte digest and produce the 65-byte
    /// recoverable form `r || s || recovery_id`; ed25519 signs the given
    /// bytes and produces a raw 64-byte signature. Curve25519 cannot sign.
    pub fn sign(&self, private_key: &[u8], digest: &[u8]) -> Result<Vec<u8>> {
        match self {
            Curve::Secp256k1 => {
                let secp = Secp256k1::new();
                let secret_key = SecretKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 key: {}", e)))?;
                let message = Message::from_digest_slice(digest)
                    .map_err(|e| Error::InvalidInput(format!("Invalid digest: {}", e)))?;

                let (recovery_id, compact) = secp
                    .sign_ecdsa_recoverable(&message, &secret_key)
                    .serialize_compact();
                let mut signature = Vec::with_capacity(65);
                signature.extend_from_slice(&compact);
                signature.push(recovery_id.to_i32() as u8);
                Ok(signature)
            }
            Curve::Nist256p1 => {
                let signing_key = p256::ecdsa::SigningKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid nist256p1 key: {}", e)))?;
                let (sig, recovery_id) = signing_key
                    .sign_prehash_recoverable(digest)
                    .map_err(|e| Error::InvalidInput(format!("Invalid digest: {}", e)))?;
                let mut signature = sig.to_bytes().to_vec();
                signature.push(recovery_id.to_byte());
                Ok(signature)
            }
            Curve::Ed25519 => {
                let signing_key = ed25519_dalek::SigningKey::from_bytes(&scalar_array(private_key)?);
                Ok(signing_key.sign(digest).to_bytes().to_vec())
            }
            Curve::Curve25519 => Err(Error::NotSupported(
                "curve25519 is key agreement only and cannot sign".to_string(),
            )),
        }
    }

    /// Sign `digest` and encode `(r, s)` as ASN.1 DER, without a recovery id.
    ///
    /// Only meaningful for the ECDSA curves; ed25519 signatures are always
    /// the raw 64-byte form.
    pub fn sign_der(&self, private_key: &[u8], digest: &[u8]) -> Result<Vec<u8>> {
        match self {
            Curve::Secp256k1 => {
                let secp = Secp256k1::new();
                let secret_key = SecretKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 key: {}", e)))?;
                let message = Message::from_digest_slice(digest)
                    .map_err(|e| Error::InvalidInput(format!("Invalid digest: {}", e)))?;
                Ok(secp.sign_ecdsa(&message, &secret_key).serialize_der().to_vec())
            }
            Curve::Nist256p1 => {
                let signing_key = p256::ecdsa::SigningKey::from_slice(private_key)
                    .map_err(|e| Error::InvalidKey(format!("Invalid nist256p1 key: {}", e)))?;
                let (sig, _) = signing_key
                    .sign_prehash_recoverable(digest)
                    .map_err(|e| Error::InvalidInput(format!("Invalid digest: {}", e)))?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
            Curve::Ed25519 | Curve::Curve25519 => Err(Error::NotSupported(format!(
                "DER encoding is not defined for {:?} signatures",
                self
            ))),
        }
    }
}

fn scalar_array(bytes: &[u8]) -> Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| Error::InvalidKey(format!("Expected 32 key bytes, got {}", bytes.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "afeefca74d9a325cf1d6b6911d61a65c32afa8e02bd5e78e2e4ac2910bab45f5";

    #[test]
    fn test_all_zero_scalar_rejected_everywhere() {
        let zeros = [0u8; 32];
        for curve in [
            Curve::Secp256k1,
            Curve::Nist256p1,
            Curve::Ed25519,
            Curve::Curve25519,
        ] {
            assert!(!curve.is_valid_key(&zeros), "{:?} accepted zero", curve);
        }
    }

    #[test]
    fn test_scalar_at_group_order_rejected() {
        // The secp256k1 group order itself is out of range
        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert!(!Curve::Secp256k1.is_valid_key(&order));
    }

    #[test]
    fn test_key_valid_on_independent_curves() {
        let key = hex::decode(KEY).unwrap();
        assert!(Curve::Secp256k1.is_valid_key(&key));
        assert!(Curve::Ed25519.is_valid_key(&key));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!Curve::Secp256k1.is_valid_key(&[0xde, 0xad, 0xbe, 0xef]));
        assert!(!Curve::Ed25519.is_valid_key(&[1u8; 31]));
    }

    #[test]
    fn test_public_key_is_deterministic() {
        let key = hex::decode(KEY).unwrap();
        let first = Curve::Secp256k1
            .public_key(&key, PublicKeyFormat::Compressed)
            .unwrap();
        let second = Curve::Secp256k1
            .public_key(&key, PublicKeyFormat::Compressed)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_curve25519_cannot_sign() {
        let key = hex::decode(KEY).unwrap();
        let digest = [7u8; 32];
        assert!(Curve::Curve25519.sign(&key, &digest).is_err());
        assert!(Curve::Curve25519.sign_der(&key, &digest).is_err());
    }

    #[test]
    fn test_ed25519_has_no_der_form() {
        let key = hex::decode(KEY).unwrap();
        assert!(Curve::Ed25519.sign_der(&key, &[7u8; 32]).is_err());
    }
}
