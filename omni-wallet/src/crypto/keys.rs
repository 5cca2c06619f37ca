//! Curve-tagged private and public key material
//!
//! A [`PrivateKey`] owns its scalar bytes in a [`SecureBytes`] buffer and is
//! validated at construction; an invalid scalar never becomes a key. All
//! curve operations check that the requested curve matches the key's tag
//! rather than silently reinterpreting bytes.

use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::crypto::curve::{Curve, PublicKeyFormat};
use crate::crypto::secure::SecureBytes;
use crate::error::{Error, Result};

/// A private key for a specific curve
#[derive(Debug)]
pub struct PrivateKey {
    /// The raw private scalar, wiped on release
    bytes: SecureBytes,
    /// The curve this key belongs to
    curve: Curve,
}

impl PrivateKey {
    /// Create a private key from raw bytes, taking ownership of the buffer.
    ///
    /// Fails if the length or the scalar range check for `curve` rejects the
    /// bytes; the rejected buffer is wiped before returning.
    pub fn new(bytes: Vec<u8>, curve: Curve) -> Result<Self> {
        if !curve.is_valid_key(&bytes) {
            let mut rejected = bytes;
            rejected.zeroize();
            return Err(Error::InvalidKey(format!(
                "Not a valid private key for {:?}",
                curve
            )));
        }
        Ok(Self {
            bytes: SecureBytes::new(bytes),
            curve,
        })
    }

    /// Create a private key from a borrowed slice.
    pub fn from_slice(bytes: &[u8], curve: Curve) -> Result<Self> {
        Self::new(bytes.to_vec(), curve)
    }

    /// Generate a new random private key for `curve`.
    ///
    /// Draws from the OS entropy source and retries until validation
    /// succeeds; a uniformly random 32-byte value may rarely fall outside
    /// the curve order.
    pub fn generate(curve: Curve) -> Self {
        let mut buf = [0u8; Curve::SCALAR_SIZE];
        loop {
            OsRng.fill_bytes(&mut buf);
            if curve.is_valid_key(&buf) {
                let key = Self {
                    bytes: SecureBytes::from_slice(&buf),
                    curve,
                };
                buf.zeroize();
                return key;
            }
        }
    }

    /// Check whether `bytes` is a valid private key for `curve`.
    ///
    /// The checks are independent per curve: the same bytes may be valid on
    /// several curves at once.
    pub fn is_valid(bytes: &[u8], curve: Curve) -> bool {
        curve.is_valid_key(bytes)
    }

    /// Get the curve this key belongs to.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Export a copy of the raw scalar. The caller owns the copy and is
    /// responsible for wiping it.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.as_slice().to_vec()
    }

    /// Derive the public key in the curve's default form (compressed for
    /// the ECDSA curves, raw for the 25519 curves).
    pub fn public_key(&self) -> Result<PublicKey> {
        let format = match self.curve {
            Curve::Secp256k1 | Curve::Nist256p1 => PublicKeyFormat::Compressed,
            Curve::Ed25519 | Curve::Curve25519 => PublicKeyFormat::Raw,
        };
        self.public_key_with_format(format)
    }

    /// Derive the public key in an explicit form.
    pub fn public_key_with_format(&self, format: PublicKeyFormat) -> Result<PublicKey> {
        let bytes = self.curve.public_key(self.bytes.as_slice(), format)?;
        let format = match self.curve {
            Curve::Ed25519 | Curve::Curve25519 => PublicKeyFormat::Raw,
            _ => format,
        };
        Ok(PublicKey {
            bytes,
            curve: self.curve,
            format,
        })
    }

    /// Sign a digest, requiring `curve` to match this key's curve.
    ///
    /// Returns the 65-byte recoverable form for the ECDSA curves and the
    /// raw 64-byte form for ed25519.
    pub fn sign(&self, digest: &[u8], curve: Curve) -> Result<Vec<u8>> {
        self.check_curve(curve)?;
        self.curve.sign(self.bytes.as_slice(), digest)
    }

    /// Sign a digest and return the ASN.1 DER encoding of `(r, s)`.
    pub fn sign_der(&self, digest: &[u8], curve: Curve) -> Result<Vec<u8>> {
        self.check_curve(curve)?;
        self.curve.sign_der(self.bytes.as_slice(), digest)
    }

    /// Release the key material early: zero-fill the backing buffer.
    ///
    /// The same wipe runs when the key is dropped. Using the key after a
    /// wipe is a contract violation; only the erasure itself is guaranteed.
    pub fn wipe(&mut self) {
        self.bytes.wipe();
    }

    fn check_curve(&self, requested: Curve) -> Result<()> {
        if requested != self.curve {
            return Err(Error::CurveMismatch {
                expected: self.curve,
                requested,
            });
        }
        Ok(())
    }
}

impl Clone for PrivateKey {
    /// Explicit deep copy; both copies wipe their own buffers independently.
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            curve: self.curve,
        }
    }
}

/// A public key for a specific curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// The serialized public key bytes
    bytes: Vec<u8>,
    /// The curve this key belongs to
    curve: Curve,
    /// The serialization form of `bytes`
    format: PublicKeyFormat,
}

impl PublicKey {
    /// Create a public key from serialized bytes, verifying that they
    /// decode to a valid curve point.
    pub fn new(bytes: Vec<u8>, curve: Curve, format: PublicKeyFormat) -> Result<Self> {
        match curve {
            Curve::Secp256k1 => {
                secp256k1::PublicKey::from_slice(&bytes)
                    .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 point: {}", e)))?;
            }
            Curve::Nist256p1 => {
                p256::ecdsa::VerifyingKey::from_sec1_bytes(&bytes)
                    .map_err(|e| Error::InvalidKey(format!("Invalid nist256p1 point: {}", e)))?;
            }
            Curve::Ed25519 => {
                let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                    Error::InvalidKey(format!("Expected 32 key bytes, got {}", bytes.len()))
                })?;
                ed25519_dalek::VerifyingKey::from_bytes(&arr)
                    .map_err(|e| Error::InvalidKey(format!("Invalid ed25519 point: {}", e)))?;
            }
            Curve::Curve25519 => {
                if bytes.len() != 32 {
                    return Err(Error::InvalidKey(format!(
                        "Expected 32 key bytes, got {}",
                        bytes.len()
                    )));
                }
            }
        }
        Ok(Self {
            bytes,
            curve,
            format,
        })
    }

    /// Get the serialized public key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the curve this key belongs to.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Get the serialization form.
    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    /// Re-serialize an ECDSA public key in the uncompressed SEC1 form.
    pub fn uncompressed(&self) -> Result<PublicKey> {
        self.convert(PublicKeyFormat::Uncompressed)
    }

    /// Re-serialize an ECDSA public key in the compressed SEC1 form.
    pub fn compressed(&self) -> Result<PublicKey> {
        self.convert(PublicKeyFormat::Compressed)
    }

    fn convert(&self, format: PublicKeyFormat) -> Result<PublicKey> {
        if self.format == format {
            return Ok(self.clone());
        }
        let bytes = match self.curve {
            Curve::Secp256k1 => {
                let point = secp256k1::PublicKey::from_slice(&self.bytes)
                    .map_err(|e| Error::InvalidKey(format!("Invalid secp256k1 point: {}", e)))?;
                match format {
                    PublicKeyFormat::Uncompressed => point.serialize_uncompressed().to_vec(),
                    _ => point.serialize().to_vec(),
                }
            }
            Curve::Nist256p1 => {
                let point = p256::ecdsa::VerifyingKey::from_sec1_bytes(&self.bytes)
                    .map_err(|e| Error::InvalidKey(format!("Invalid nist256p1 point: {}", e)))?;
                let compress = !matches!(format, PublicKeyFormat::Uncompressed);
                point.to_encoded_point(compress).as_bytes().to_vec()
            }
            Curve::Ed25519 | Curve::Curve25519 => {
                return Err(Error::NotSupported(format!(
                    "{:?} public keys only have the raw form",
                    self.curve
                )))
            }
        };
        Ok(PublicKey {
            bytes,
            curve: self.curve,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "afeefca74d9a325cf1d6b6911d61a65c32afa8e02bd5e78e2e4ac2910bab45f5";

    #[test]
    fn test_create_round_trips_bytes() {
        let bytes = hex::decode(KEY).unwrap();
        let key = PrivateKey::new(bytes.clone(), Curve::Secp256k1).unwrap();
        assert_eq!(key.to_bytes(), bytes);
        assert_eq!(key.curve(), Curve::Secp256k1);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        assert!(PrivateKey::new(hex::decode("deadbeef").unwrap(), Curve::Secp256k1).is_err());
        assert!(PrivateKey::new(vec![0u8; 32], Curve::Secp256k1).is_err());
        assert!(PrivateKey::new(vec![0u8; 32], Curve::Ed25519).is_err());
    }

    #[test]
    fn test_generate_produces_valid_keys() {
        for curve in [Curve::Secp256k1, Curve::Nist256p1, Curve::Ed25519] {
            let key = PrivateKey::generate(curve);
            assert!(PrivateKey::is_valid(&key.to_bytes(), curve));
        }
    }

    #[test]
    fn test_public_keys_match_reference_vectors() {
        let bytes = hex::decode(KEY).unwrap();

        let secp = PrivateKey::new(bytes.clone(), Curve::Secp256k1).unwrap();
        assert_eq!(
            hex::encode(secp.public_key_with_format(PublicKeyFormat::Uncompressed).unwrap().as_bytes()),
            "0499c6f51ad6f98c9c583f8e92bb7758ab2ca9a04110c0a1126ec43e5453d196c1\
             66b489a4b7c491e7688e6ebea3a71fc3a1a48d60f98d5ce84c93b65e423fde91"
        );

        let nist = PrivateKey::new(bytes.clone(), Curve::Nist256p1).unwrap();
        assert_eq!(
            hex::encode(nist.public_key().unwrap().as_bytes()),
            "026d786ab8fda678cf50f71d13641049a393b325063b8c0d4e5070de48a2caf9ab"
        );

        let x25519 = PrivateKey::new(bytes, Curve::Curve25519).unwrap();
        assert_eq!(
            hex::encode(x25519.public_key().unwrap().as_bytes()),
            "686cfce9108566dd43fc6aa75e31f9a9f319c9e9c04d6ad0a52505b86bc17c3a"
        );
    }

    #[test]
    fn test_sign_rejects_mismatched_curve() {
        let key = PrivateKey::from_slice(&hex::decode(KEY).unwrap(), Curve::Secp256k1).unwrap();
        let result = key.sign(&[7u8; 32], Curve::Ed25519);
        assert!(matches!(result, Err(Error::CurveMismatch { .. })));
    }

    #[test]
    fn test_wipe_zero_fills_backing_bytes() {
        let mut key = PrivateKey::from_slice(&hex::decode(KEY).unwrap(), Curve::Secp256k1).unwrap();
        key.wipe();
        assert!(key.to_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_compressed_uncompressed_round_trip() {
        let key = PrivateKey::from_slice(&hex::decode(KEY).unwrap(), Curve::Secp256k1).unwrap();
        let compressed = key.public_key().unwrap();
        let uncompressed = compressed.uncompressed().unwrap();
        assert_eq!(uncompressed.as_bytes().len(), 65);
        assert_eq!(uncompressed.compressed().unwrap(), compressed);
    }
}
