//! Mnemonic phrase generation and handling
//!
//! BIP-39 semantics throughout: wordlist + checksum validation, and seed
//! stretching with PBKDF2-HMAC-SHA512 over 2048 iterations with the salt
//! `"mnemonic" || passphrase`. The stretching is deliberately expensive and
//! runs as ordinary synchronous CPU work.

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::crypto::secure::SecureBytes;
use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic =
        Mnemonic::from_entropy(&entropy).map_err(|e| Error::Mnemonic(e.to_string()))?;
    entropy.zeroize();

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase against the wordlist and checksum
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse_normalized(phrase)
        .map(|_| ())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Check a mnemonic phrase without reporting the reason for rejection
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_normalized(phrase).is_ok()
}

/// Derive the 64-byte seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<SecureBytes> {
    let mnemonic =
        Mnemonic::parse_normalized(phrase).map_err(|e| Error::Mnemonic(e.to_string()))?;

    let mut seed = mnemonic.to_seed(passphrase.unwrap_or(""));
    let out = SecureBytes::from_slice(&seed);
    seed.zeroize();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_mnemonic() {
        let mnemonic = generate_mnemonic(MnemonicStrength::Words12).unwrap();
        assert!(is_valid_mnemonic(&mnemonic));

        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        assert_eq!(words.len(), 12);
    }

    #[test]
    fn test_validate_mnemonic() {
        let valid = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(valid).is_ok());
        assert!(validate_mnemonic(invalid).is_err());
    }

    #[test]
    fn test_bad_word_count_rejected() {
        assert!(validate_mnemonic("abandon abandon abandon").is_err());
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        // Last word swapped so the checksum no longer matches
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(validate_mnemonic(phrase).is_err());
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = mnemonic_to_seed(mnemonic, None).unwrap();
        assert_eq!(seed.len(), 64);

        // The passphrase feeds the PBKDF2 salt, so it must change the seed
        let salted = mnemonic_to_seed(mnemonic, Some("TREZOR")).unwrap();
        assert_ne!(seed.as_slice(), salted.as_slice());
    }

    #[test]
    fn test_seed_vector() {
        // BIP-39 reference vector for the all-abandon phrase, empty passphrase
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = mnemonic_to_seed(mnemonic, None).unwrap();
        assert_eq!(
            hex::encode(seed.as_slice()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }
}
